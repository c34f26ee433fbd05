// Adapters layer: concrete implementations of the ports (browser transport, terminal UI, OS paths).

pub mod console;
pub mod profile;
pub mod webdriver;
