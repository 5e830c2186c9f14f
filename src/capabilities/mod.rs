pub mod vision;

pub use vision::supports_vision;
