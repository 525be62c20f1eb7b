pub mod login;
pub mod me;
pub mod register;

pub use login::handle_login;
pub use me::handle_me;
pub use register::handle_register;
