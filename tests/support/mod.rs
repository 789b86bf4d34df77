#![allow(dead_code)]

pub mod http_stub;
pub mod images;
pub mod orbitaleye_env;
pub mod stub_classifier;
