//! FileMaker Data API ports

pub mod ports;

pub use ports::{CloudTokenProvider, FileMakerGateway, GatewayFactory};
