mod entity;

use proc_macro::TokenStream;

/// Derive macro for the `Entity` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Entity)]
/// #[entity(collection = "accounts")]
/// struct Account {
///     #[entity(id)]
///     pub id: String,
///     pub email: String,
/// }
/// ```
///
/// - `#[entity(collection = "...")]` sets the collection name.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[entity(id)]` marks the `String` field used as the unique identifier.
///   If omitted, defaults to a field named `id`.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input)
}
