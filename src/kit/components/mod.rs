// Tether Kit component module organization

// Input components
pub mod button;
pub mod input;

// Layout components
pub mod layout;

// Re-export commonly used components
pub use button::Button;
pub use input::Input;
pub use layout::Layout;
