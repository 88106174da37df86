fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .ok_or("no window".to_string())?
        .local_storage()
        .map_err(|_| "localStorage threw".to_string())?
        .ok_or("localStorage unavailable".to_string())
}

pub(super) fn local_storage_get(key: &str) -> Result<Option<String>, String> {
    local_storage()?
        .get_item(key)
        .map_err(|_| format!("localStorage: get {key} threw"))
}

pub(super) fn local_storage_set(key: &str, value: &str) -> Result<(), String> {
    local_storage()?
        .set_item(key, value)
        .map_err(|_| format!("localStorage: set {key} threw (quota?)"))
}
