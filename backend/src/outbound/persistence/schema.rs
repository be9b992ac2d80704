//! Diesel table definitions for the favourites schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Favourite lists, one owner each.
    favorite_lists (id) {
        /// Primary key assigned by a serial sequence.
        id -> Int4,
        /// Display name, at most 100 characters.
        list_name -> Varchar,
        /// Identity service user that owns the list.
        user_id -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue products saved in a list. Rows cascade with their list.
    favorite_items (list_id, item_id) {
        /// Owning list.
        list_id -> Int4,
        /// Catalogue product identifier.
        item_id -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(favorite_items -> favorite_lists (list_id));
diesel::allow_tables_to_appear_in_same_query!(favorite_items, favorite_lists);
