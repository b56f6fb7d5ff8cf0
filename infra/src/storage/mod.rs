//! Object storage module - Supabase Storage over its REST API

pub mod supabase;


pub use supabase::SupabaseStorage;
