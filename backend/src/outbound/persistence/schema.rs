//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Enumerations
//! (`gender`, `status`, `mode`) are stored as lowercase text.

diesel::table! {
    /// Registered accounts.
    accounts (account_id) {
        /// Primary key.
        account_id -> Uuid,
        /// Nickname; unique ignoring case.
        nick_name -> Text,
        first_name -> Nullable<Text>,
        last_name -> Nullable<Text>,
        birth_date -> Nullable<Timestamptz>,
        gender -> Nullable<Text>,
        /// Avatar document (`{"url": ...}`).
        avatar -> Nullable<Jsonb>,
        /// 32 lowercase hexadecimal characters; unique.
        activation_code -> Varchar,
        status -> Text,
        mode -> Text,
        /// When `mode` last changed.
        mode_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Contacts owned by an account; deleted with it.
    contacts (contact_id) {
        contact_id -> Uuid,
        account_id -> Uuid,
        email -> Text,
        main -> Bool,
        /// One-to-one link to a phone number.
        phone_number_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Phone numbers referenced by contacts.
    phone_numbers (phone_number_id) {
        phone_number_id -> Uuid,
        national -> Nullable<Int8>,
        international -> Nullable<Text>,
        country_code -> Nullable<Int4>,
        region_code -> Nullable<Text>,
    }
}

diesel::joinable!(contacts -> accounts (account_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, contacts, phone_numbers);
