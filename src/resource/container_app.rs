use super::ModelResource;
use schemakit::{Block, Schema, SchemaMap, ValueType};
use statebind::{BlockType, TypedResource, typed_model};
use std::collections::HashMap;

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct ContainerAppModel {
        pub name: String => "name",
        pub resource_group_name: String => "resource_group_name",
        pub container_app_environment_id: String => "container_app_environment_id",
        pub revision_mode: String => "revision_mode",
        pub template: Vec<Template> => "template",
        pub ingress: Option<Vec<Ingress>> => "ingress",
        pub workload_profile_name: Option<String> => "workload_profile_name, addedInNextMajorVersion",
        pub tags: HashMap<String, String> => "tags",

        pub latest_revision_fqdn: String => "latest_revision_fqdn",
        pub outbound_ip_addresses: Vec<String> => "outbound_ip_addresses",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Template {
        pub containers: Vec<Container> => "container",
        pub min_replicas: i64 => "min_replicas",
        pub max_replicas: i64 => "max_replicas",
        pub revision_suffix: Option<String> => "revision_suffix",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Container {
        pub name: String => "name",
        pub image: String => "image",
        pub cpu: f64 => "cpu",
        pub memory: String => "memory",
        pub args: Option<Vec<String>> => "args",
        pub command: Option<Vec<String>> => "command",
        pub env: Vec<ContainerEnvVar> => "env",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct ContainerEnvVar {
        pub name: String => "name",
        pub value: Option<String> => "value",
        pub secret_name: Option<String> => "secret_name",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Ingress {
        pub allow_insecure_connections: bool => "allow_insecure_connections",
        pub external_enabled: bool => "external_enabled",
        pub fqdn: String => "fqdn",
        pub target_port: i64 => "target_port",
        pub transport: String => "transport",
    }
}

/// `example_container_app`
#[derive(Debug, Clone, Copy)]
pub struct ContainerAppResource;

impl TypedResource for ContainerAppResource {
    fn resource_type(&self) -> &'static str {
        "example_container_app"
    }

    fn arguments(&self) -> SchemaMap {
        let mut schema = SchemaMap::new();
        schema.insert("name".into(), Schema::required(ValueType::String));
        schema.insert(
            "resource_group_name".into(),
            Schema::required(ValueType::String),
        );
        schema.insert(
            "container_app_environment_id".into(),
            Schema::required(ValueType::String),
        );
        schema.insert(
            "revision_mode".into(),
            Schema::required(ValueType::String).with_description("Single or Multiple"),
        );
        schema.insert(
            "template".into(),
            Schema::block_list(template_block()).max_items(1),
        );
        schema.insert(
            "ingress".into(),
            Schema::block_list(ingress_block()).optional().max_items(1),
        );
        schema.insert(
            "workload_profile_name".into(),
            Schema::new(ValueType::String).optional(),
        );
        schema.insert("tags".into(), Schema::map_of(ValueType::String).optional());
        schema
    }

    fn attributes(&self) -> SchemaMap {
        let mut schema = SchemaMap::new();
        schema.insert(
            "latest_revision_fqdn".into(),
            Schema::computed_only(ValueType::String),
        );
        schema.insert(
            "outbound_ip_addresses".into(),
            Schema::list_of(ValueType::String).computed(),
        );
        schema
    }

    fn model_object(&self) -> Option<BlockType> {
        Some(BlockType::of::<ContainerAppModel>())
    }
}

impl ModelResource for ContainerAppResource {
    type Model = ContainerAppModel;
}

fn template_block() -> Block {
    let env = Block::new()
        .attribute("name", Schema::required(ValueType::String))
        .attribute("value", Schema::new(ValueType::String).optional())
        .attribute("secret_name", Schema::new(ValueType::String).optional());
    let container = Block::new()
        .attribute("name", Schema::required(ValueType::String))
        .attribute("image", Schema::required(ValueType::String))
        .attribute("cpu", Schema::required(ValueType::Float))
        .attribute("memory", Schema::required(ValueType::String))
        .attribute("args", Schema::list_of(ValueType::String).optional())
        .attribute("command", Schema::list_of(ValueType::String).optional())
        .attribute("env", Schema::block_list(env).optional());

    Block::new()
        .attribute("container", Schema::block_list(container))
        .attribute("min_replicas", Schema::new(ValueType::Int).optional())
        .attribute("max_replicas", Schema::new(ValueType::Int).optional())
        .attribute(
            "revision_suffix",
            Schema::new(ValueType::String).optional().computed(),
        )
}

fn ingress_block() -> Block {
    Block::new()
        .attribute(
            "allow_insecure_connections",
            Schema::new(ValueType::Bool).optional(),
        )
        .attribute("external_enabled", Schema::new(ValueType::Bool).optional())
        .attribute("fqdn", Schema::computed_only(ValueType::String))
        .attribute("target_port", Schema::required(ValueType::Int))
        .attribute("transport", Schema::new(ValueType::String).optional())
}
