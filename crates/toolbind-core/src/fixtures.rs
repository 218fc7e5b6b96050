// crates/toolbind-core/src/fixtures.rs
// ============================================================================
// Module: Descriptor Fixtures
// Description: Canonical sample descriptor sets.
// Purpose: Shared inputs for unit, integration and system tests.
// Dependencies: toolbind-core
// ============================================================================

//! ## Overview
//! Sample sets mirroring the schemas shipped under `proto/`:
//! - [`catalog_set`]: weather catalog with a required field, an example-only
//!   field, a derived tool name and an undocumented operation.
//! - [`invoice_set`]: invoice creation with nested, repeated and map fields.
//! - [`recursive_set`]: self-referential tree for cycle protection.

use crate::descriptor::DescriptorSet;
use crate::descriptor::FieldAnnotation;
use crate::descriptor::FieldDescriptor;
use crate::descriptor::FieldType;
use crate::descriptor::FileDescriptor;
use crate::descriptor::MessageDescriptor;
use crate::descriptor::MethodDescriptor;
use crate::descriptor::ScalarType;
use crate::descriptor::ServiceDescriptor;
use crate::descriptor::ToolAnnotation;

/// File name of the catalog fixture.
pub const CATALOG_FILE: &str = "catalog.proto";
/// File name of the invoice fixture.
pub const INVOICE_FILE: &str = "invoice/v1/invoice.proto";
/// File name of the recursive fixture.
pub const TREE_FILE: &str = "tree/v1/tree.proto";

/// Weather catalog fixture.
#[must_use]
pub fn catalog_set() -> DescriptorSet {
    let mut set = DescriptorSet::new();
    add_catalog(&mut set);
    set
}

/// Invoice fixture.
#[must_use]
pub fn invoice_set() -> DescriptorSet {
    let mut set = DescriptorSet::new();
    add_invoice(&mut set);
    set
}

/// Recursive tree fixture.
#[must_use]
pub fn recursive_set() -> DescriptorSet {
    let mut set = DescriptorSet::new();
    add_tree(&mut set);
    set
}

/// Catalog, invoice and tree fixtures in one set.
#[must_use]
pub fn combined_set() -> DescriptorSet {
    let mut set = DescriptorSet::new();
    add_catalog(&mut set);
    add_invoice(&mut set);
    add_tree(&mut set);
    set
}

/// Adds the catalog fixture.
fn add_catalog(set: &mut DescriptorSet) {
    set.add_message(
        MessageDescriptor::new("catalog", "catalog.GetWeatherRequest")
            .with_field(
                FieldDescriptor::scalar("city", 1, ScalarType::String)
                    .annotated(FieldAnnotation::described("City and optional units").required()),
            )
            .with_field(
                FieldDescriptor::scalar("units", 2, ScalarType::String).annotated(
                    FieldAnnotation::described("Unit system for temperatures")
                        .with_example("metric"),
                ),
            ),
    );
    set.add_message(
        MessageDescriptor::new("catalog", "catalog.GetWeatherResponse")
            .with_field(FieldDescriptor::scalar("summary", 1, ScalarType::String))
            .with_field(FieldDescriptor::scalar("temperature", 2, ScalarType::Double)),
    );
    set.add_message(
        MessageDescriptor::new("catalog", "catalog.ListForecastsRequest")
            .with_field(
                FieldDescriptor::scalar("days", 1, ScalarType::Int32)
                    .annotated(FieldAnnotation::default().with_example("3")),
            )
            .with_field(FieldDescriptor::scalar("include_alerts", 2, ScalarType::Bool)),
    );
    set.add_message(
        MessageDescriptor::new("catalog", "catalog.ListForecastsResponse").with_field(
            FieldDescriptor::scalar("forecasts", 1, ScalarType::String).repeated(),
        ),
    );
    set.add_message(MessageDescriptor::new("catalog", "catalog.UndocumentedRequest"));
    set.add_message(MessageDescriptor::new("catalog", "catalog.UndocumentedResponse"));
    set.add_file(
        FileDescriptor::new(CATALOG_FILE, "catalog").with_service(
            ServiceDescriptor::new("ToolCatalog")
                .with_method(
                    MethodDescriptor::new(
                        "GetWeather",
                        ".catalog.GetWeatherRequest",
                        ".catalog.GetWeatherResponse",
                    )
                    .documented(ToolAnnotation::new(
                        "get_weather",
                        "Get the current weather for a city.",
                    )),
                )
                .with_method(MethodDescriptor::new(
                    "Undocumented",
                    ".catalog.UndocumentedRequest",
                    ".catalog.UndocumentedResponse",
                ))
                .with_method(
                    MethodDescriptor::new(
                        "ListForecasts",
                        ".catalog.ListForecastsRequest",
                        ".catalog.ListForecastsResponse",
                    )
                    .documented(ToolAnnotation::new("", "List upcoming daily forecasts.")),
                ),
        ),
    );
}

/// Adds the invoice fixture.
fn add_invoice(set: &mut DescriptorSet) {
    let package = "invoice.v1";
    set.add_message(
        MessageDescriptor::new(package, "invoice.v1.Invoice")
            .with_field(FieldDescriptor::scalar("customer_id", 1, ScalarType::String))
            .with_field(
                FieldDescriptor::message("line_items", 2, ".invoice.v1.Invoice.LineItem")
                    .repeated(),
            )
            .with_field(
                FieldDescriptor::message("tags", 3, ".invoice.v1.Invoice.TagsEntry").repeated(),
            )
            .with_field(
                FieldDescriptor::scalar("memo", 4, ScalarType::String)
                    .annotated(FieldAnnotation::described("Free-form note printed on the invoice")),
            ),
    );
    set.add_message(
        MessageDescriptor::new(package, "invoice.v1.Invoice.LineItem")
            .with_field(FieldDescriptor::scalar("line_item_id", 1, ScalarType::String))
            .with_field(FieldDescriptor::scalar("description", 2, ScalarType::String))
            .with_field(
                FieldDescriptor::scalar("quantity", 3, ScalarType::Int32)
                    .annotated(FieldAnnotation::described("Units billed").required()),
            )
            .with_field(FieldDescriptor::scalar("unit_price_cents", 4, ScalarType::Int64)),
    );
    set.add_message(
        MessageDescriptor::new(package, "invoice.v1.Invoice.Tags")
            .with_field(FieldDescriptor::scalar("tag", 1, ScalarType::String).repeated()),
    );
    set.add_message(MessageDescriptor::map_entry(
        package,
        "invoice.v1.Invoice.TagsEntry",
        FieldType::Scalar(ScalarType::String),
        FieldType::Message(String::from(".invoice.v1.Invoice.Tags")),
    ));
    set.add_message(MessageDescriptor::new(package, "invoice.v1.CreateInvoiceRequest").with_field(
        FieldDescriptor::message("invoice", 1, ".invoice.v1.Invoice")
            .annotated(FieldAnnotation::described("info to create invoice").required()),
    ));
    set.add_message(
        MessageDescriptor::new(package, "invoice.v1.CreateInvoiceResponse")
            .with_field(FieldDescriptor::scalar("invoice_id", 1, ScalarType::String)),
    );
    set.add_file(
        FileDescriptor::new(INVOICE_FILE, package).with_service(
            ServiceDescriptor::new("InvoiceService").with_method(
                MethodDescriptor::new(
                    "CreateInvoice",
                    ".invoice.v1.CreateInvoiceRequest",
                    ".invoice.v1.CreateInvoiceResponse",
                )
                .documented(ToolAnnotation::new("create_invoice", "Create a new invoice.")),
            ),
        ),
    );
}

/// Adds the recursive tree fixture.
fn add_tree(set: &mut DescriptorSet) {
    let package = "tree.v1";
    set.add_message(
        MessageDescriptor::new(package, "tree.v1.Node")
            .with_field(
                FieldDescriptor::scalar("label", 1, ScalarType::String)
                    .annotated(FieldAnnotation::described("Node label").required()),
            )
            .with_field(
                FieldDescriptor::message("children", 2, ".tree.v1.Node")
                    .repeated()
                    .annotated(FieldAnnotation::described("Child nodes")),
            )
            .with_field(FieldDescriptor::message("parent", 3, ".tree.v1.Node")),
    );
    set.add_message(
        MessageDescriptor::new(package, "tree.v1.PlantTreeRequest").with_field(
            FieldDescriptor::message("root", 1, ".tree.v1.Node")
                .annotated(FieldAnnotation::described("Root of the tree").required()),
        ),
    );
    set.add_message(
        MessageDescriptor::new(package, "tree.v1.PlantTreeResponse")
            .with_field(FieldDescriptor::scalar("node_count", 1, ScalarType::Uint32)),
    );
    set.add_file(
        FileDescriptor::new(TREE_FILE, package).with_service(
            ServiceDescriptor::new("Forest").with_method(
                MethodDescriptor::new(
                    "PlantTree",
                    ".tree.v1.PlantTreeRequest",
                    ".tree.v1.PlantTreeResponse",
                )
                .documented(ToolAnnotation::new("plant_tree", "Plant a tree of labelled nodes.")),
            ),
        ),
    );
}
