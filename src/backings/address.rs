/// Postal address
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub country: String,
}

crate::properties!(Address {
    "Street" => street: String,
    "City" => city: String,
    "PostalCode" => postal_code: Option<String>,
    "Country" => country: String,
});

crate::register_backing!(Address, "Street, city, postal code and country");
