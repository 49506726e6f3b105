//! Esquema Diesel (mantenido a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    schemes (id) {
        id -> Integer,
        scheme_name -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    steps (id) {
        id -> Integer,
        scheme_id -> Integer,
        step_number -> Integer,
        instructions -> Text,
    }
}

diesel::joinable!(steps -> schemes (scheme_id));
diesel::allow_tables_to_appear_in_same_query!(schemes, steps);
