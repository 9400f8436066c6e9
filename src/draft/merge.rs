use serde_json::Value;

/// Deep-merges `patch` into `target`.
///
/// Objects merge key by key; any other patch value (scalars, arrays, null)
/// replaces the target value. Keys absent from the patch are never touched.
pub fn merge_json(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match target_map.get_mut(key) {
                    Some(existing) if existing.is_object() && patch_value.is_object() => {
                        merge_json(existing, patch_value);
                    }
                    _ => {
                        target_map.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}
