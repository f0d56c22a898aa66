//! JSON-schema documents describing the connector's I/O contracts.
//!
//! The orchestrator uses these to validate contexts before and after
//! invoking the workflow operations; the connector itself performs no
//! schema validation.

use serde_json::{json, Value};

/// Shape of a credentials registry entry.
#[must_use]
pub fn credentials_registry_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "credentials": {
                "type": "object",
                "properties": {
                    "accessKeyId": { "type": "string" },
                    "accessKeySecret": { "type": "string" }
                },
                "required": [ "accessKeyId", "accessKeySecret" ]
            }
        },
        "required": [ "credentials" ]
    })
}

/// Shape of the context accepted by the mutating operations.
#[must_use]
pub fn mutating_context_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "ramUser": {
                "type": "object",
                "properties": {
                    "username": { "type": "string" },
                    "comments": { "type": "string" },
                    "displayName": { "type": "string" },
                    "email": { "type": "string" },
                    "mobilePhone": { "type": "string" },
                    "deleteUser": { "type": "boolean", "default": false }
                },
                "required": [ "username" ]
            },
            "loginProfile": {
                "type": "object",
                "properties": {
                    "password": { "type": "string" },
                    "requirePasswordReset": { "type": "boolean", "default": true }
                },
                "required": [ "password" ]
            },
            "accessPolicies": {
                "type": "object",
                "properties": {
                    "userPolicies": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "type": { "type": "string" }
                            },
                            "required": [ "name", "type" ]
                        }
                    },
                    "groups": {
                        "type": "array",
                        "items": { "type": "string" }
                    }
                }
            }
        },
        "required": [ "ramUser" ]
    })
}

/// Shape of the context accepted by the read-only operations.
#[must_use]
pub fn read_only_context_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "ramUser": {
                "type": "object",
                "properties": {
                    "username": { "type": "string" }
                },
                "required": [ "username" ]
            }
        },
        "required": [ "ramUser" ]
    })
}

/// Shape of a batch-retrieval request.
#[must_use]
pub fn list_context_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "marker": {
                "type": "string",
                "description": "unique string that can be used to resume batch retrieval if truncated"
            },
            "maxItems": {
                "type": "number",
                "description": "maximum number of items retrieved from repository"
            },
            "containGroup": {
                "type": "string",
                "description": "only items that contain this group will be retrieved"
            }
        }
    })
}
