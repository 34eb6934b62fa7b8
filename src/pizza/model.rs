//! Pizza request bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Payload;

/// Pizza sizes accepted by the `size` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PizzaSize {
    Personal,
    Small,
    Medium,
    #[default]
    Large,
    #[serde(rename = "Extra Large")]
    ExtraLarge,
}

impl PizzaSize {
    pub const ALL: [PizzaSize; 5] = [
        PizzaSize::Personal,
        PizzaSize::Small,
        PizzaSize::Medium,
        PizzaSize::Large,
        PizzaSize::ExtraLarge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PizzaSize::Personal => "Personal",
            PizzaSize::Small => "Small",
            PizzaSize::Medium => "Medium",
            PizzaSize::Large => "Large",
            PizzaSize::ExtraLarge => "Extra Large",
        }
    }
}

/// Body of `POST /api/pizzas`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePizza {
    pub name: String,
    pub created_by: String,
    #[serde(default)]
    pub size: Option<PizzaSize>,
    #[serde(default)]
    pub toppings: Option<Vec<String>>,
}

impl CreatePizza {
    /// Store payload; absent optional fields are left to schema defaults
    pub fn into_payload(self) -> Payload {
        let mut payload = Payload::new();
        payload.insert("name".into(), Value::String(self.name));
        payload.insert("createdBy".into(), Value::String(self.created_by));
        if let Some(size) = self.size {
            payload.insert("size".into(), Value::String(size.as_str().into()));
        }
        if let Some(toppings) = self.toppings {
            payload.insert("toppings".into(), strings(toppings));
        }
        payload
    }
}

/// Body of `PUT /api/pizzas/{id}`; only present fields change
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePizza {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub size: Option<PizzaSize>,
    #[serde(default)]
    pub toppings: Option<Vec<String>>,
}

impl UpdatePizza {
    pub fn into_payload(self) -> Payload {
        let mut payload = Payload::new();
        if let Some(name) = self.name {
            payload.insert("name".into(), Value::String(name));
        }
        if let Some(created_by) = self.created_by {
            payload.insert("createdBy".into(), Value::String(created_by));
        }
        if let Some(size) = self.size {
            payload.insert("size".into(), Value::String(size.as_str().into()));
        }
        if let Some(toppings) = self.toppings {
            payload.insert("toppings".into(), strings(toppings));
        }
        payload
    }
}

fn strings(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}
