// system-tests/src/lib.rs
// ============================================================================
// Module: Toolbind System Tests Library
// Description: Message types and generated bindings for the fixture schemas.
// Purpose: Compile emitted bindings next to their message types.
// Dependencies: serde, toolbind-runtime
// ============================================================================

//! ## Overview
//! Each module mirrors a protobuf package from `proto/` and includes the
//! bindings the build script generated for it. The message structs follow
//! prost's layout (nested types in snake_case modules, message fields as
//! `Option`) and add the serde derives agent runtimes need for JSON.

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// `catalog` package.
pub mod catalog {
    use serde::Deserialize;
    use serde::Serialize;

    /// Weather lookup input.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct GetWeatherRequest {
        /// City name.
        pub city: String,
        /// Unit system.
        pub units: String,
    }

    /// Weather lookup result.
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct GetWeatherResponse {
        /// Human-readable summary.
        pub summary: String,
        /// Temperature in the requested units.
        pub temperature: f64,
    }

    /// Forecast listing input.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ListForecastsRequest {
        /// Number of days.
        pub days: i32,
        /// Include weather alerts.
        pub include_alerts: bool,
    }

    /// Forecast listing result.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ListForecastsResponse {
        /// One line per day.
        pub forecasts: Vec<String>,
    }

    include!(concat!(env!("OUT_DIR"), "/catalog_agent_tools.rs"));
}

// ============================================================================
// SECTION: Invoice
// ============================================================================

/// `invoice` packages.
pub mod invoice {
    /// `invoice.v1` package.
    pub mod v1 {
        use std::collections::BTreeMap;

        use serde::Deserialize;
        use serde::Serialize;

        /// Invoice draft.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct Invoice {
            /// Billed customer.
            pub customer_id: String,
            /// Billed lines.
            pub line_items: Vec<invoice::LineItem>,
            /// Tag groups by key.
            pub tags: BTreeMap<String, invoice::Tags>,
            /// Free-form note.
            pub memo: String,
        }

        /// Types nested in [`Invoice`].
        pub mod invoice {
            use serde::Deserialize;
            use serde::Serialize;

            /// One billed line.
            #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
            #[serde(default)]
            pub struct LineItem {
                /// Line identifier.
                pub line_item_id: String,
                /// Line description.
                pub description: String,
                /// Units billed.
                pub quantity: i32,
                /// Unit price in cents.
                pub unit_price_cents: i64,
            }

            /// Tag group.
            #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
            #[serde(default)]
            pub struct Tags {
                /// Tags in the group.
                pub tag: Vec<String>,
            }
        }

        /// Invoice creation input.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct CreateInvoiceRequest {
            /// Invoice to create.
            pub invoice: Option<Invoice>,
        }

        /// Invoice creation result.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct CreateInvoiceResponse {
            /// Assigned identifier.
            pub invoice_id: String,
        }

        include!(concat!(env!("OUT_DIR"), "/invoice/v1/invoice_agent_tools.rs"));
    }
}

// ============================================================================
// SECTION: Tree
// ============================================================================

/// `tree` packages.
pub mod tree {
    /// `tree.v1` package.
    pub mod v1 {
        use serde::Deserialize;
        use serde::Serialize;

        /// Labelled tree node.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct Node {
            /// Node label.
            pub label: String,
            /// Child nodes.
            pub children: Vec<Node>,
            /// Parent node.
            pub parent: Option<Box<Node>>,
        }

        /// Tree planting input.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct PlantTreeRequest {
            /// Root node.
            pub root: Option<Node>,
        }

        /// Tree planting result.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct PlantTreeResponse {
            /// Number of nodes planted.
            pub node_count: u32,
        }

        include!(concat!(env!("OUT_DIR"), "/tree/v1/tree_agent_tools.rs"));
    }
}
