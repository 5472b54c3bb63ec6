//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a migration
//! changes the schema, regenerate them with `diesel print-schema` or update
//! them by hand.

diesel::table! {
    /// Administrator accounts.
    users (id) {
        id -> Int4,
        name -> Varchar,
        /// Unique login address (unique index `users_email_key`).
        email -> Varchar,
        /// Bcrypt hash; never selected into a projection.
        password_hash -> Varchar,
        admin -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Couriers.
    deliverymen (id) {
        id -> Int4,
        name -> Varchar,
        email -> Varchar,
        avatar_id -> Nullable<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Delivery recipients with their postal address.
    recipients (id) {
        id -> Int4,
        name -> Varchar,
        street -> Varchar,
        number -> Int4,
        complement -> Nullable<Varchar>,
        state -> Varchar,
        city -> Varchar,
        cep -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Deliveries. Rows cascade away with their recipient or deliveryman.
    deliveries (id) {
        id -> Int4,
        product -> Varchar,
        recipient_id -> Int4,
        deliveryman_id -> Int4,
        signature_id -> Nullable<Int4>,
        start_date -> Nullable<Timestamptz>,
        end_date -> Nullable<Timestamptz>,
        /// Set once, never cleared.
        canceled_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Problems reported against a delivery.
    delivery_problems (id) {
        id -> Int4,
        delivery_id -> Int4,
        description -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(deliveries -> recipients (recipient_id));
diesel::joinable!(deliveries -> deliverymen (deliveryman_id));
diesel::joinable!(delivery_problems -> deliveries (delivery_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    deliverymen,
    recipients,
    deliveries,
    delivery_problems,
);
