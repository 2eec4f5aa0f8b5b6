pub mod font;
pub mod widget;

pub use font::Font;
pub use widget::{Widget, WidgetKind, WidgetListener};
