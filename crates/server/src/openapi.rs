use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CustomerDoc {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub membership: String,
    pub total_spent: f64,
    #[schema(example = "2026-10-19")]
    pub join_date: String,
    #[schema(example = "2026-10-19")]
    pub last_purchase: String,
}

/// Registration body. Text fields also accept numbers and `true`, which are
/// stored as strings (`"phone": 5551234` is saved as `"5551234"`). `false`,
/// `0`, `null` and `""` count as not provided; objects and arrays are rejected.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CustomerInputDoc {
    /// Case-insensitive; stored uppercased.
    #[schema(example = "c1")]
    pub id: String,
    pub name: String,
    pub email: String,
    /// Digits may be sent as a JSON number; stored as a string.
    #[schema(example = "555-0100")]
    pub phone: String,
    /// Defaults to "Not provided".
    pub address: Option<String>,
    /// Defaults to "Regular".
    pub membership: Option<String>,
    /// Number or numeric string; anything else is stored as 0.
    pub total_spent: Option<f64>,
}

#[derive(ToSchema)]
pub struct CustomerListDoc { pub success: bool, pub count: usize, pub customers: Vec<CustomerDoc> }

#[derive(ToSchema)]
pub struct CustomerResponseDoc { pub success: bool, pub customer: CustomerDoc }

#[derive(ToSchema)]
pub struct CustomerCreatedDoc { pub success: bool, pub message: String, pub customer: CustomerDoc, pub total: usize }

#[derive(ToSchema)]
pub struct ErrorDoc { pub success: bool, pub message: String, pub error: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::customers::list_customers,
        crate::routes::customers::get_customer,
        crate::routes::customers::create_customer,
    ),
    components(
        schemas(
            HealthResponse,
            CustomerDoc,
            CustomerInputDoc,
            CustomerListDoc,
            CustomerResponseDoc,
            CustomerCreatedDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "customers")
    )
)]
pub struct ApiDoc;
