use serde_json::{Map, Value};

/// Short attribute names used in the table, paired with the names the API exposes.
pub const KEY_NAMES: [(&str, &str); 10] = [
    ("crtdDt", "created"),
    ("pckg", "package"),
    ("arn", "arn"),
    ("rgn", "region"),
    ("pckgVrsn", "packageVersion"),
    ("dplySts", "deployStatus"),
    ("lyrVrsn", "version"),
    ("exDt", "expiryDate"),
    ("rqrmntsTxt", "requirements"),
    ("sha256", "sha256"),
];

pub fn public_name(storage_key: &str) -> Option<&'static str> {
    KEY_NAMES
        .iter()
        .find(|(stored, _)| *stored == storage_key)
        .map(|(_, public)| *public)
}

/// Rename top-level keys to their public names. Unknown keys are kept as is.
pub fn map_keys(object: Map<String, Value>) -> Map<String, Value> {
    object
        .into_iter()
        .map(|(key, value)| match public_name(&key) {
            Some(public) => (public.to_string(), value),
            None => (key, value),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renames_known_keys() {
        let stored = json!({
            "crtdDt": "2024-05-13",
            "pckg": "requests",
            "arn": "arn:aws:lambda:us-east-1:1:layer:requests:9",
            "rgn": "us-east-1",
            "pckgVrsn": "2.31.0",
        });

        let mapped = map_keys(stored.as_object().unwrap().clone());

        assert_eq!(
            Value::Object(mapped),
            json!({
                "created": "2024-05-13",
                "package": "requests",
                "arn": "arn:aws:lambda:us-east-1:1:layer:requests:9",
                "region": "us-east-1",
                "packageVersion": "2.31.0",
            })
        );
    }

    #[test]
    fn unknown_keys_pass_through() {
        let stored = json!({ "pckg": "numpy", "someNewAttr": 1 });
        let mapped = map_keys(stored.as_object().unwrap().clone());

        assert_eq!(mapped.get("package"), Some(&json!("numpy")));
        assert_eq!(mapped.get("someNewAttr"), Some(&json!(1)));
        assert_eq!(mapped.len(), 2);
    }

    #[test]
    fn public_names_are_unique() {
        let mut names: Vec<_> = KEY_NAMES.iter().map(|(_, p)| *p).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), KEY_NAMES.len());
    }
}
