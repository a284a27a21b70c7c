//! HTML5 page skeletons, navigation menus and form builders, on top
//! of the `tagfactory` tag engine.

pub mod boxed_error;
pub mod io_util;
pub mod template;
pub mod snippets;
pub mod config;
pub mod nav;
pub mod page;
pub mod form;

pub use tagfactory;
