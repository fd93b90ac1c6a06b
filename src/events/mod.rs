pub mod keyboard;
pub mod pointer;
pub mod shell;

pub use keyboard::wire_global_keydown;
pub use pointer::PointerBinding;
pub use shell::wire_shell;
