use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Browser console.log, used for diagnostics only.
    #[wasm_bindgen(js_namespace = console)]
    pub fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => {
        $crate::console::log(&format!($($t)*))
    };
}
pub(crate) use console_log;
