pub mod config;
pub mod logging;

// Download engine and its building blocks
pub mod fetch;
pub mod storage;
pub mod url_model;

// Documents: scanning, resolving, rewriting
pub mod batch;
pub mod capabilities;
pub mod document;
pub mod markup;
pub mod paths;
pub mod prologue;
pub mod rewrite;
pub mod scan;
pub mod tree;
