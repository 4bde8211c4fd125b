use super::ModelResource;
use schemakit::{Block, Schema, SchemaMap, ValueType};
use statebind::{BlockType, TypedResource, typed_model};
use std::collections::HashMap;

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct RegistryTaskModel {
        pub name: String => "name",
        pub container_registry_id: String => "container_registry_id",
        pub agent_pool_name: Option<String> => "agent_pool_name",
        pub agent_setting: Vec<AgentSetting> => "agent_setting",
        pub enabled: bool => "enabled",
        pub is_system_task: bool => "is_system_task",
        pub log_template: Option<String> => "log_template",
        pub platform: Vec<Platform> => "platform",
        pub docker_step: Vec<DockerStep> => "docker_step",
        pub timeout_in_seconds: i32 => "timeout_in_seconds",
        pub tags: HashMap<String, String> => "tags",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct AgentSetting {
        pub cpu: i32 => "cpu",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Platform {
        pub os: String => "os",
        pub architecture: Option<String> => "architecture",
        pub variant: Option<String> => "variant",
    }
}

typed_model! {
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct DockerStep {
        pub context_path: String => "context_path",
        pub context_access_token: String => "context_access_token",
        pub dockerfile_path: String => "dockerfile_path",
        pub image_names: Vec<String> => "image_names",
        pub push_enabled: bool => "push_enabled",
        pub cache_enabled: bool => "cache_enabled",
        pub target: Option<String> => "target",
        pub arguments: HashMap<String, String> => "arguments",
        pub secret_arguments: HashMap<String, String> => "secret_arguments",
    }
}

/// `example_container_registry_task`
#[derive(Debug, Clone, Copy)]
pub struct RegistryTaskResource;

impl TypedResource for RegistryTaskResource {
    fn resource_type(&self) -> &'static str {
        "example_container_registry_task"
    }

    fn arguments(&self) -> SchemaMap {
        let agent_setting = Block::new().attribute("cpu", Schema::required(ValueType::Int));
        let platform = Block::new()
            .attribute("os", Schema::required(ValueType::String))
            .attribute("architecture", Schema::new(ValueType::String).optional())
            .attribute("variant", Schema::new(ValueType::String).optional());
        let docker_step = Block::new()
            .attribute("context_path", Schema::required(ValueType::String))
            .attribute("context_access_token", Schema::required(ValueType::String))
            .attribute("dockerfile_path", Schema::required(ValueType::String))
            .attribute("image_names", Schema::set_of(ValueType::String).optional())
            .attribute("push_enabled", Schema::new(ValueType::Bool).optional())
            .attribute("cache_enabled", Schema::new(ValueType::Bool).optional())
            .attribute("target", Schema::new(ValueType::String).optional())
            .attribute("arguments", Schema::map_of(ValueType::String).optional())
            .attribute(
                "secret_arguments",
                Schema::map_of(ValueType::String).optional(),
            );

        let mut schema = SchemaMap::new();
        schema.insert("name".into(), Schema::required(ValueType::String));
        schema.insert(
            "container_registry_id".into(),
            Schema::required(ValueType::String),
        );
        schema.insert(
            "agent_pool_name".into(),
            Schema::new(ValueType::String).optional(),
        );
        schema.insert(
            "agent_setting".into(),
            Schema::block_list(agent_setting).optional().max_items(1),
        );
        schema.insert("enabled".into(), Schema::new(ValueType::Bool).optional());
        schema.insert(
            "is_system_task".into(),
            Schema::new(ValueType::Bool).optional(),
        );
        schema.insert(
            "log_template".into(),
            Schema::new(ValueType::String).optional(),
        );
        schema.insert(
            "platform".into(),
            Schema::block_list(platform).optional().max_items(1),
        );
        schema.insert(
            "docker_step".into(),
            Schema::block_list(docker_step).optional().max_items(1),
        );
        schema.insert(
            "timeout_in_seconds".into(),
            Schema::new(ValueType::Int)
                .optional()
                .with_description("Between 300 and 28800 seconds"),
        );
        schema.insert("tags".into(), Schema::map_of(ValueType::String).optional());
        schema
    }

    fn attributes(&self) -> SchemaMap {
        SchemaMap::new()
    }

    fn model_object(&self) -> Option<BlockType> {
        Some(BlockType::of::<RegistryTaskModel>())
    }
}

impl ModelResource for RegistryTaskResource {
    type Model = RegistryTaskModel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use statebind::{Error, Features, ResourceData, ResourceMetaData, Value, validate_resource};
    use std::collections::BTreeMap;

    fn state(json: serde_json::Value) -> BTreeMap<String, Value> {
        match Value::from(json) {
            Value::Map(map) => map,
            other => panic!("not a map: {other:?}"),
        }
    }

    #[test]
    fn test_validates() {
        assert_eq!(
            validate_resource(&RegistryTaskResource, Features::default()),
            Ok(())
        );
    }

    #[test]
    fn test_decode_docker_step() {
        let mut data = ResourceData::from_values(state(serde_json::json!({
            "name": "build",
            "container_registry_id": "/registries/acr",
            "timeout_in_seconds": 3600,
            "docker_step": [{
                "context_path": "https://github.com/example/app#main",
                "context_access_token": "token",
                "dockerfile_path": "Dockerfile",
                "image_names": ["app:{{.Run.ID}}"],
                "arguments": {"PROFILE": "release"},
            }],
        })));
        let metadata = ResourceMetaData::new(Features::default()).with_resource_data(&mut data);

        let mut task = RegistryTaskModel::default();
        metadata.decode(&mut task).unwrap();
        assert_eq!(task.timeout_in_seconds, 3600);
        assert!(task.agent_setting.is_empty());
        let step = &task.docker_step[0];
        assert_eq!(step.image_names, vec!["app:{{.Run.ID}}".to_string()]);
        assert_eq!(step.arguments["PROFILE"], "release");
        assert!(step.secret_arguments.is_empty());
    }

    #[test]
    fn test_cpu_out_of_range() {
        let mut data = ResourceData::from_values(state(serde_json::json!({
            "agent_setting": [{"cpu": 5_000_000_000_i64}],
        })));
        let metadata = ResourceMetaData::new(Features::default()).with_resource_data(&mut data);

        let err = metadata
            .decode(&mut RegistryTaskModel::default())
            .unwrap_err();
        match err {
            Error::Conversion { field, path, .. } => {
                assert_eq!(field, "agent_setting[0].cpu");
                assert_eq!(path, "agent_setting.0.cpu");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
