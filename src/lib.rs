#![allow(clippy::collapsible_if, clippy::len_without_is_empty)]

/// Use mimalloc as the global allocator for all binaries.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod eol;
