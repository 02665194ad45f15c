pub mod hints;
pub mod modal;
pub mod tabs;
pub mod toast;
