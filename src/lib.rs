pub mod config;
pub mod directory;
pub mod pages;
pub mod supabase;
pub mod tracing;
