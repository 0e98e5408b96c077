//! Inline keyboard menus addressed by hierarchical callback paths.
//!
//! Every button press carries a path such as `/settings/language/lang:de`.
//! Menus are built from [`MenuTemplate`]s, frozen into a [`MenuMiddleware`]
//! and routed by matching the pressed path against the triggers of the menu
//! tree.

pub mod action;
pub mod align;
pub mod back;
pub mod body;
pub mod choices;
pub mod choose;
pub mod context;
pub mod error;
pub mod keyboard;
pub mod middleware;
pub mod pagination;
pub mod path;
pub mod responder;
pub mod select;
pub mod template;
pub mod toggle;
pub mod trigger;

pub use action::{action_fn, ActionEntry, ActionFn, ActionRegistry, Invocation, Navigation};
pub use align::{get_buttons_of_page, get_rows_of_buttons, maximum_buttons_per_page, ChoiceLayout};
pub use back::{back_main_menu_buttons_from_config, create_back_main_menu_buttons};
pub use body::{Body, MediaKind, ParseMode};
pub use choices::Choices;
pub use choose::ChoiceOptions;
pub use context::{hide_fn, key_fn, path_fn, ContextValue, HideFn, KeyFn, MenuContext, PathFn};
pub use error::{MenuError, Result};
pub use keyboard::{
    rows_fn, ButtonKind, ButtonRow, ButtonSource, ButtonTemplate, InlineKeyboardButton, InlineKeyboardMarkup, Keyboard,
    RowsFn, MAX_CALLBACK_DATA_BYTES,
};
pub use middleware::{render_menu, Dispatch, MenuMiddleware, MenuSender, RenderedMenu};
pub use pagination::{create_pagination_choices, PaginationOptions};
pub use path::{combine_path, is_menu_path, menu_of_path, root_of_path};
pub use responder::{MatchMode, Matched, MenuNode, Responder};
pub use select::SelectOptions;
pub use template::{ButtonOptions, MenuLike, MenuTemplate, Submenu};
pub use toggle::{format_state, ToggleOptions};
pub use trigger::{combine_trigger, create_root_menu_trigger, RootTrigger, Trigger, TriggerFlags};

pub use inline_menu_config::MenuConfig;
