pub mod capabilities;
pub mod config;
pub mod images;
pub mod imgbb;
pub mod llm;
pub mod notion;
pub mod qna;
