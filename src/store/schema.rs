// Collection schema
//
// Symbol fields are optional so plain-text documents (and collections
// created before a field existed) still import.

use serde_json::{json, Value};

/// Typesense collection definition for the document layout in `document.rs`
pub fn collection_schema(name: &str) -> Value {
    json!({
        "name": name,
        "fields": [
            {"name": "id",            "type": "string"},
            {"name": "path",          "type": "string", "optional": true, "index": false},
            {"name": "relative_path", "type": "string"},
            {"name": "filename",      "type": "string"},
            {"name": "extension",     "type": "string", "facet": true},
            {"name": "subsystem",     "type": "string", "facet": true},
            {"name": "namespace",     "type": "string", "optional": true},
            {"name": "class_names",   "type": "string[]", "optional": true},
            {"name": "method_names",  "type": "string[]", "optional": true},
            {"name": "symbols",       "type": "string[]"},
            {"name": "content",       "type": "string"},
            {"name": "mtime",         "type": "int64"},
            {"name": "base_types",    "type": "string[]", "optional": true},
            {"name": "call_sites",    "type": "string[]", "optional": true},
            {"name": "method_sigs",   "type": "string[]", "optional": true},
            {"name": "type_refs",     "type": "string[]", "optional": true},
            {"name": "attributes",    "type": "string[]", "optional": true, "facet": true},
            {"name": "usings",        "type": "string[]", "optional": true},
            {"name": "priority",      "type": "int32"}
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::build_document;

    fn field<'a>(schema: &'a Value, name: &str) -> &'a Value {
        schema["fields"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["name"] == name)
            .unwrap()
    }

    #[test]
    fn test_facets_and_required_fields() {
        let schema = collection_schema("codesearch_files");
        assert_eq!(schema["name"], "codesearch_files");
        assert_eq!(field(&schema, "extension")["facet"], true);
        assert_eq!(field(&schema, "attributes")["facet"], true);
        assert_eq!(field(&schema, "path")["index"], false);
        assert_eq!(field(&schema, "symbols").get("optional"), None);
        assert_eq!(field(&schema, "priority")["type"], "int32");
    }

    #[test]
    fn test_every_document_field_is_in_schema() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("A.cs");
        std::fs::write(&path, "class A { }").unwrap();
        let doc = build_document(dir.path(), &path, &Config::default()).unwrap();

        let schema = collection_schema("c");
        let doc_json = serde_json::to_value(&doc).unwrap();
        for key in doc_json.as_object().unwrap().keys() {
            field(&schema, key);
        }
    }
}
