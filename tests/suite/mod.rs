mod bootstrap;
mod config;
mod navigation;
mod render;
