//! Postgres functions used by the repositories that Diesel does not ship.

use diesel::sql_types::{Array, Integer, Uuid};

diesel::define_sql_function! {
    /// Larger of two integers; used to keep counters from going negative.
    fn greatest(a: Integer, b: Integer) -> Integer;
}

diesel::define_sql_function! {
    fn array_append(array: Array<Uuid>, element: Uuid) -> Array<Uuid>;
}

diesel::define_sql_function! {
    fn array_remove(array: Array<Uuid>, element: Uuid) -> Array<Uuid>;
}
