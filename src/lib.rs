pub mod config;

pub mod entity;

pub mod media;

pub mod store;
