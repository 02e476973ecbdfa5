mod common;

mod facade;
mod injection;
mod provider;
