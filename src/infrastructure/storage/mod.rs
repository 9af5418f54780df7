pub mod supabase;

pub use supabase::SupabaseStorage;
