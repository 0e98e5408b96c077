use thiserror::Error;

/// Errors raised while building or dispatching menus.
///
/// Everything up to `CallbackDataTooLong` is a configuration problem and is
/// reported while templates are assembled or the middleware is created.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("empty string is not a relative path")]
    EmptyRelativePath,

    #[error("relative path '{0}' starts with ./ which is ambiguous; use '.' for this menu or drop the prefix")]
    AmbiguousRelativePath(String),

    #[error("invalid trigger '{source_text}': {reason}")]
    InvalidTrigger { source_text: String, reason: String },

    #[error("invalid root menu trigger '{0}': {1}")]
    InvalidRootTrigger(String, String),

    #[error("parent trigger '{0}' has to start with ^ and end with /")]
    InvalidParentTrigger(String),

    #[error("child trigger '{0}' is not allowed to carry flags; flags are inherited from the parent")]
    ChildTriggerFlags(String),

    #[error("invalid child trigger '{0}': {1}")]
    InvalidChildTrigger(String, String),

    #[error("trigger '{0}' is already registered on this menu")]
    DuplicateTrigger(String),

    #[error("invalid choice key '{0}': {1}")]
    InvalidChoiceKey(String, String),

    #[error("callback data '{path}' (from relative path '{relative_path}') is {length} bytes; the limit is 64")]
    CallbackDataTooLong {
        relative_path: String,
        path: String,
        length: usize,
    },

    #[error("the root trigger is a pattern; an explicit menu path is required")]
    AmbiguousRootPath,

    #[error("'{0}' is not a menu path; menu paths end with a slash")]
    NotAMenuPath(String),

    #[error("there is no menu '{0}' which can be reached from this menu")]
    UnreachableMenu(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = MenuError> = std::result::Result<T, E>;
