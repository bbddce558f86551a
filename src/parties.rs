// Copyright 2025 Cowboy AI, LLC.

//! Named-party aggregates: Client, Payee, Person, PaymentMethod
//!
//! Four aggregates with an identical shape: an owner, a per-owner-unique
//! display name, and nothing else. The framework is instantiated once per
//! entity; the macro keeps the stamped-out instantiations in lockstep.

use crate::command_handlers::{CreateSpec, UpdateSpec};
use crate::cqrs::Command;
use crate::entity::{
    AggregateRoot, ClientId, EntityName, PayeeId, PaymentMethodId, PersonId, UserId,
};
use crate::events::EventSource;
use crate::read_model::{ListProjection, SortDirection};
use crate::user::User;
use crate::validation::{ForeignRef, NamedAggregate};
use crate::value_objects::Name;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! named_party {
    (
        $aggregate:ident, $id_type:ident, $view:ident,
        $create_cmd:ident, $update_cmd:ident,
        $create_spec:ident, $update_spec:ident, $project:ident,
        $id_field:ident, $name:literal
    ) => {
        #[doc = concat!("A ", $name, " record owned by one user")]
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $aggregate {
            id: $id_type,
            owner_id: UserId,
            name: Name,
            created_at: DateTime<Utc>,
            version: u64,
        }

        impl $aggregate {
            #[doc = concat!("Create a ", $name)]
            pub fn create(owner_id: UserId, name: Name) -> Self {
                Self {
                    id: $id_type::new(),
                    owner_id,
                    name,
                    created_at: Utc::now(),
                    version: 0,
                }
            }

            /// Rename the record
            pub fn rename(&mut self, name: Name) {
                self.name = name;
            }

            /// The owning user
            pub fn owner_id(&self) -> UserId {
                self.owner_id
            }

            /// The display name
            pub fn name(&self) -> &Name {
                &self.name
            }

            /// Creation timestamp
            pub fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        }

        impl AggregateRoot for $aggregate {
            type Id = $id_type;

            fn id(&self) -> Self::Id {
                self.id
            }

            fn version(&self) -> u64 {
                self.version
            }

            fn increment_version(&mut self) {
                self.version += 1;
            }
        }

        impl EntityName for $aggregate {
            const NAME: &'static str = $name;
        }

        impl EventSource for $aggregate {}

        impl NamedAggregate for $aggregate {
            fn owner_uuid(&self) -> Uuid {
                *self.owner_id.as_uuid()
            }

            fn display_name(&self) -> &str {
                self.name.as_str()
            }
        }

        #[doc = concat!("Create a new ", $name)]
        #[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
        pub struct $create_cmd {
            /// The owning user
            pub owner_id: Uuid,
            /// Display name, unique per owner
            pub name: String,
        }

        impl Command for $create_cmd {}

        #[doc = concat!("Rename an existing ", $name)]
        #[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
        pub struct $update_cmd {
            /// New display name
            pub name: String,
        }

        impl Command for $update_cmd {}

        #[doc = concat!("Strategy spec for creating ", $name, " records")]
        pub fn $create_spec() -> CreateSpec<$create_cmd, $aggregate> {
            CreateSpec {
                references: Box::new(|c: &$create_cmd| {
                    vec![ForeignRef::new(User::NAME, c.owner_id)]
                }),
                unique_name: Some(Box::new(|c: &$create_cmd| {
                    (c.owner_id, c.name.trim().to_string())
                })),
                construct: Box::new(|c: &$create_cmd| {
                    Ok($aggregate::create(
                        UserId::from_uuid(c.owner_id),
                        Name::new(c.name.as_str())?,
                    ))
                }),
            }
        }

        #[doc = concat!("Strategy spec for updating ", $name, " records")]
        pub fn $update_spec() -> UpdateSpec<$update_cmd, $aggregate> {
            UpdateSpec {
                references: Box::new(|_| Vec::new()),
                apply: Box::new(|record: &mut $aggregate, c: &$update_cmd| {
                    record.rename(Name::new(c.name.as_str())?);
                    Ok(())
                }),
            }
        }

        #[doc = concat!($name, " read-model projection")]
        #[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
        pub struct $view {
            /// Unique identifier
            pub $id_field: Uuid,
            /// The owning user
            pub owner_id: Uuid,
            /// Display name
            pub name: String,
            /// Creation timestamp
            pub created_at: DateTime<Utc>,
        }

        impl EntityName for $view {
            const NAME: &'static str = $name;
        }

        impl ListProjection for $view {
            fn sortable_columns() -> &'static [&'static str] {
                &["name", "created_at"]
            }

            fn searchable_columns() -> &'static [&'static str] {
                &["name"]
            }

            fn default_sort() -> (&'static str, SortDirection) {
                ("name", SortDirection::Ascending)
            }

            fn id_column() -> &'static str {
                stringify!($id_field)
            }
        }

        #[doc = concat!("Project a ", $name, " into its view")]
        pub fn $project(record: &$aggregate) -> $view {
            $view {
                $id_field: *record.id().as_uuid(),
                owner_id: *record.owner_id().as_uuid(),
                name: record.name().as_str().to_string(),
                created_at: record.created_at(),
            }
        }
    };
}

named_party!(
    Client, ClientId, ClientView, CreateClient, UpdateClient,
    client_create_spec, client_update_spec, project_client,
    client_id, "Client"
);

named_party!(
    Payee, PayeeId, PayeeView, CreatePayee, UpdatePayee,
    payee_create_spec, payee_update_spec, project_payee,
    payee_id, "Payee"
);

named_party!(
    Person, PersonId, PersonView, CreatePerson, UpdatePerson,
    person_create_spec, person_update_spec, project_person,
    person_id, "Person"
);

named_party!(
    PaymentMethod, PaymentMethodId, PaymentMethodView, CreatePaymentMethod, UpdatePaymentMethod,
    payment_method_create_spec, payment_method_update_spec, project_payment_method,
    payment_method_id, "PaymentMethod"
);
