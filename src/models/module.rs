use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// UI hint only; never consulted by access evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Sidebar,
    Menu,
}

impl ModuleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Sidebar => "sidebar",
            ModuleType::Menu => "menu",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sidebar" => Some(ModuleType::Sidebar),
            "menu" => Some(ModuleType::Menu),
            _ => None,
        }
    }
}

/// A protectable resource category (e.g. "customer", "role").
/// Permissions reference modules by id, so renaming a module never
/// invalidates existing grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub module_type: Option<ModuleType>,
    pub created_at: String,
    pub updated_at: String,
}

impl Module {
    pub fn new(name: String, description: Option<String>, module_type: Option<ModuleType>) -> Self {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            module_type,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

// DTOs for API
#[derive(Debug, Deserialize)]
pub struct CreateModuleRequest {
    pub name: String,
    pub description: Option<String>,
    pub module_type: Option<ModuleType>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateModuleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub module_type: Option<ModuleType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModuleResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub module_type: Option<ModuleType>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Module> for ModuleResponse {
    fn from(m: Module) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            module_type: m.module_type,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
