#![allow(dead_code)]

pub mod mock_host;
pub mod recording_sink;
