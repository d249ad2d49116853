mod common;
mod remote;
mod service;
