use super::ModelResource;
use schemakit::{Block, Schema, SchemaMap, ValueType};
use statebind::{BlockType, TypedResource, typed_model};
use std::collections::HashMap;

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct LabModel {
        pub name: String => "name",
        pub resource_group_name: String => "resource_group_name",
        pub location: String => "location",
        pub title: String => "title",
        pub description: Option<String> => "description",
        pub lab_plan_id: Option<String> => "lab_plan_id",
        pub auto_shutdown: Vec<AutoShutdown> => "auto_shutdown",
        pub security: Vec<Security> => "security",
        pub virtual_machine: Vec<VirtualMachine> => "virtual_machine",
        pub tags: HashMap<String, String> => "tags",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct AutoShutdown {
        pub disconnect_delay: Option<String> => "disconnect_delay",
        pub idle_delay: Option<String> => "idle_delay",
        pub shutdown_on_idle: String => "shutdown_on_idle",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Security {
        pub open_access_enabled: bool => "open_access_enabled",
        pub registration_code: String => "registration_code",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct VirtualMachine {
        pub admin_user: Vec<Credential> => "admin_user",
        pub create_option: String => "create_option",
        pub image_reference: Vec<ImageReference> => "image_reference",
        pub sku: Vec<Sku> => "sku",
        pub usage_quota: String => "usage_quota",
        pub shared_password_enabled: bool => "shared_password_enabled",
        pub gpu_drivers_installed: bool =>
            "additional_capability_gpu_drivers_installed, removedInNextMajorVersion",
        pub additional_capabilities: Vec<String> =>
            "additional_capabilities, addedInNextMajorVersion",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Credential {
        pub username: String => "username",
        pub password: String => "password",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct ImageReference {
        pub id: Option<String> => "id",
        pub offer: Option<String> => "offer",
        pub publisher: Option<String> => "publisher",
        pub sku: Option<String> => "sku",
        pub version: Option<String> => "version",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Sku {
        pub name: String => "name",
        pub capacity: i64 => "capacity",
    }
}

/// `example_lab_service_lab`
#[derive(Debug, Clone, Copy)]
pub struct LabResource;

impl TypedResource for LabResource {
    fn resource_type(&self) -> &'static str {
        "example_lab_service_lab"
    }

    fn arguments(&self) -> SchemaMap {
        let mut schema = SchemaMap::new();
        schema.insert("name".into(), Schema::required(ValueType::String));
        schema.insert(
            "resource_group_name".into(),
            Schema::required(ValueType::String),
        );
        schema.insert("location".into(), Schema::required(ValueType::String));
        schema.insert("title".into(), Schema::required(ValueType::String));
        schema.insert(
            "description".into(),
            Schema::new(ValueType::String).optional(),
        );
        schema.insert(
            "lab_plan_id".into(),
            Schema::new(ValueType::String).optional(),
        );
        schema.insert(
            "auto_shutdown".into(),
            Schema::block_list(auto_shutdown_block()).optional().max_items(1),
        );
        schema.insert(
            "security".into(),
            Schema::block_list(security_block()).max_items(1),
        );
        schema.insert(
            "virtual_machine".into(),
            Schema::block_list(virtual_machine_block()).max_items(1),
        );
        schema.insert("tags".into(), Schema::map_of(ValueType::String).optional());
        schema
    }

    fn attributes(&self) -> SchemaMap {
        SchemaMap::new()
    }

    fn model_object(&self) -> Option<BlockType> {
        Some(BlockType::of::<LabModel>())
    }
}

impl ModelResource for LabResource {
    type Model = LabModel;
}

fn auto_shutdown_block() -> Block {
    Block::new()
        .attribute(
            "disconnect_delay",
            Schema::new(ValueType::String).optional(),
        )
        .attribute("idle_delay", Schema::new(ValueType::String).optional())
        .attribute(
            "shutdown_on_idle",
            Schema::new(ValueType::String).optional(),
        )
}

fn security_block() -> Block {
    Block::new()
        .attribute("open_access_enabled", Schema::required(ValueType::Bool))
        .attribute(
            "registration_code",
            Schema::computed_only(ValueType::String),
        )
}

fn virtual_machine_block() -> Block {
    let credential = Block::new()
        .attribute("username", Schema::required(ValueType::String))
        .attribute("password", Schema::required(ValueType::String));
    let image_reference = Block::new()
        .attribute("id", Schema::new(ValueType::String).optional())
        .attribute("offer", Schema::new(ValueType::String).optional())
        .attribute("publisher", Schema::new(ValueType::String).optional())
        .attribute("sku", Schema::new(ValueType::String).optional())
        .attribute("version", Schema::new(ValueType::String).optional());
    let sku = Block::new()
        .attribute("name", Schema::required(ValueType::String))
        .attribute("capacity", Schema::required(ValueType::Int));

    Block::new()
        .attribute(
            "admin_user",
            Schema::block_list(credential).max_items(1),
        )
        .attribute(
            "create_option",
            Schema::new(ValueType::String).optional(),
        )
        .attribute(
            "image_reference",
            Schema::block_list(image_reference).max_items(1),
        )
        .attribute("sku", Schema::block_list(sku).max_items(1))
        .attribute("usage_quota", Schema::new(ValueType::String).optional())
        .attribute(
            "shared_password_enabled",
            Schema::new(ValueType::Bool).optional(),
        )
        .attribute(
            "additional_capability_gpu_drivers_installed",
            Schema::new(ValueType::Bool).optional(),
        )
        .attribute(
            "additional_capabilities",
            Schema::set_of(ValueType::String).optional(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use statebind::{Decoder, Encoder, Features, NullLogger, Value, validate_resource};
    use std::collections::BTreeMap;

    fn sample() -> BTreeMap<String, Value> {
        let json: serde_json::Value =
            serde_json::from_str(include_str!("../../demos/lab.json")).unwrap();
        match Value::from(json) {
            Value::Map(map) => map,
            other => panic!("not a map: {other:?}"),
        }
    }

    #[test]
    fn test_validates() {
        assert_eq!(validate_resource(&LabResource, Features::default()), Ok(()));
    }

    #[test]
    fn test_decode_three_levels() {
        let mut lab = LabModel::default();
        Decoder::new(&NullLogger).decode(&mut lab, &sample()).unwrap();

        assert_eq!(lab.name, "intro-to-rust");
        assert_eq!(lab.tags["course"], "cs101");
        let vm = &lab.virtual_machine[0];
        assert_eq!(vm.admin_user[0].username, "instructor");
        assert_eq!(vm.sku[0].capacity, 12);
        assert_eq!(vm.image_reference[0].offer.as_deref(), Some("0001-com-ubuntu-server-jammy"));
        assert!(vm.gpu_drivers_installed);
        assert_eq!(lab.auto_shutdown[0].idle_delay, None);
    }

    #[test]
    fn test_gpu_flag_moves_in_next_major() {
        let mut lab = LabModel::default();
        Decoder::new(&NullLogger).decode(&mut lab, &sample()).unwrap();

        let encoded = Encoder::new(Features::next_major(), &NullLogger)
            .encode(&lab)
            .unwrap();
        let Value::List(vms) = &encoded["virtual_machine"] else {
            panic!("virtual_machine is not a list");
        };
        let vm = vms[0].as_map().unwrap();
        assert!(!vm.contains_key("additional_capability_gpu_drivers_installed"));
        assert_eq!(vm["additional_capabilities"], Value::List(vec![]));
    }
}
