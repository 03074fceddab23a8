//! The Swagger 2.0 description of the hub API, served at `/specs`.

use serde_json::{json, Value};

use crate::config::HubConfig;

pub const API_TITLE: &str = "CSDH API";
pub const API_VERSION: &str = "0.0.1";

fn query_parameter(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "description": description,
        "required": true,
        "type": "string",
    })
}

fn body_parameter(description: &str, schema: Value) -> Value {
    json!({
        "name": "body",
        "in": "body",
        "description": description,
        "required": true,
        "schema": schema,
    })
}

fn operation(tag: &str, summary: &str, parameters: Vec<Value>) -> Value {
    json!({
        "tags": [tag],
        "summary": summary,
        "produces": ["application/json"],
        "parameters": parameters,
        "responses": {
            "200": {"description": "Success"},
            "default": {
                "description": "Unexpected error",
                "schema": {"$ref": "#/definitions/Message"},
            },
        },
    })
}

/// Build the API description for a server reachable at `config.authority()`.
pub fn swagger(config: &HubConfig) -> Value {
    json!({
        "swagger": "2.0",
        "info": {
            "title": API_TITLE,
            "version": API_VERSION,
            "description": "API for the CLARIAH Structured Data Hub",
        },
        "host": config.authority(),
        "schemes": ["http"],
        "basePath": "/",
        "paths": {
            "/trigger": {
                "post": operation("Deployment", "Pull the latest code after a GitHub push", vec![
                    body_parameter("GitHub push event", json!({"type": "object"})),
                ]),
            },
            "/dataset/definition": {
                "get": operation("Dataset", "Dataset definition, from the cache when available", vec![
                    query_parameter("file", "Path of the dataset, relative to the dataset root"),
                ]),
            },
            "/dataset/save": {
                "post": operation("Dataset", "Store an annotated dataset in the cache", vec![
                    body_parameter("The dataset", json!({"$ref": "#/definitions/SaveRequest"})),
                ]),
            },
            "/dataset/submit": {
                "post": operation("Dataset", "Convert a dataset to RDF and upload it", vec![
                    body_parameter("The submission", json!({"$ref": "#/definitions/SubmitRequest"})),
                ]),
            },
            "/community/dimensions": {
                "get": operation("Community", "Dimensions known to the community", vec![]),
            },
            "/community/schemes": {
                "get": operation("Community", "Concept schemes known to the community", vec![]),
            },
            "/community/definition": {
                "get": operation("Community", "Definition of a variable", vec![
                    query_parameter("uri", "URI of the variable"),
                ]),
            },
            "/community/concepts": {
                "get": operation("Community", "Concepts of a scheme or collection", vec![
                    query_parameter("uri", "URI of the scheme or collection"),
                ]),
            },
            "/browse": {
                "get": operation("Files", "List a directory below the dataset root", vec![
                    query_parameter("path", "Directory, relative to the dataset root"),
                ]),
            },
            "/iri": {
                "get": operation("Files", "Turn a string into a valid IRI", vec![
                    query_parameter("iri", "The string to convert"),
                ]),
            },
        },
        "definitions": {
            "Message": {
                "type": "object",
                "properties": {
                    "code": {"type": "integer"},
                    "message": {"type": "string"},
                },
            },
            "SaveRequest": {
                "type": "object",
                "required": ["dataset"],
                "properties": {
                    "dataset": {"type": "object"},
                },
            },
            "SubmitRequest": {
                "type": "object",
                "required": ["file", "path", "profile"],
                "properties": {
                    "file": {"type": "string"},
                    "path": {"type": "string"},
                    "variables": {"type": "object"},
                    "profile": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "email": {"type": "string"},
                        },
                    },
                },
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swagger_uses_server_authority() {
        let doc = swagger(&HubConfig::default().with_port(5001));
        assert_eq!(doc["swagger"], "2.0");
        assert_eq!(doc["host"], "127.0.0.1:5001");
        assert_eq!(doc["info"]["title"], API_TITLE);
        assert!(doc["paths"]["/dataset/submit"]["post"].is_object());
    }
}
