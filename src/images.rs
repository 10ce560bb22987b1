use wasm_bindgen::prelude::*;
use base64::{Engine as _, engine::general_purpose};
use crate::element::{Element, ElementKind};
use crate::engine::DesignEngine;

/// Every upload lands in a fixed square box; the bitmap is scaled into it
/// at draw time.
const UPLOAD_BOX: f64 = 150.0;

/// Builds a data URL for uploaded image bytes, sniffing the format for the
/// mime type. Only formats the canvas can decode are accepted; the bytes
/// must decode so garbage never reaches the cache.
pub fn data_url_from_bytes(bytes: &[u8]) -> Result<String, String> {
    let format = image::guess_format(bytes).map_err(|e| e.to_string())?;
    let mime = match format {
        image::ImageFormat::Png => "image/png",
        image::ImageFormat::Jpeg => "image/jpeg",
        other => return Err(format!("unsupported image format: {:?}", other)),
    };
    image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    Ok(format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes)))
}

#[wasm_bindgen]
impl DesignEngine {
    /// Inserts an uploaded image as a new element at the canvas center and
    /// starts its decode. Returns `{"success": true, "id": …}` or an error
    /// object when the bytes are not a decodable image.
    pub fn insert_uploaded_image(&mut self, bytes: &[u8]) -> String {
        let src = match data_url_from_bytes(bytes) {
            Ok(v) => v,
            Err(e) => return format!("{{\"error\": \"{}\"}}", e),
        };
        let id = self.fresh_id();
        self.add_element(Element::new_image(
            id,
            self.canvas_width / 2.0,
            self.canvas_height / 2.0,
            src.clone(),
            UPLOAD_BOX,
            UPLOAD_BOX,
        ));
        self.selected_id = Some(id);
        self.request_image(&src);
        format!("{{\"success\": true, \"id\": {}}}", id)
    }

    /// Starts an async decode for `src` unless it is already cached, in
    /// flight, or has failed before. Completion caches the bitmap and invokes
    /// the host's re-render callback; failure is logged and the source is
    /// blacklisted (no retry).
    pub fn request_image(&self, src: &str) {
        {
            let cache = self.images.borrow();
            if cache.loaded.contains_key(src)
                || cache.pending.contains(src)
                || cache.failed.contains(src)
            {
                return;
            }
        }
        self.images.borrow_mut().pending.insert(src.to_string());
        #[cfg(target_arch = "wasm32")]
        self.spawn_decode(src);
    }

    pub fn is_image_loaded(&self, src: &str) -> bool {
        self.images.borrow().loaded.contains_key(src)
    }
}

#[cfg(target_arch = "wasm32")]
impl DesignEngine {
    fn spawn_decode(&self, src: &str) {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;
        use web_sys::HtmlImageElement;

        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(_) => {
                self.images.borrow_mut().pending.remove(src);
                return;
            }
        };
        img.set_cross_origin(Some("anonymous"));

        let cache = self.images.clone();
        let on_loaded = self.on_image_loaded.clone();
        let key = src.to_string();
        let img_for_cache = img.clone();
        let onload = Closure::once_into_js(move || {
            let mut cache = cache.borrow_mut();
            cache.pending.remove(&key);
            cache.loaded.insert(key, img_for_cache);
            drop(cache);
            if let Some(cb) = on_loaded {
                let _ = cb.call0(&JsValue::NULL);
            }
        });
        img.set_onload(Some(onload.unchecked_ref()));

        let cache = self.images.clone();
        let key = src.to_string();
        let onerror = Closure::once_into_js(move || {
            log::warn!("image decode failed: {}", truncate_src(&key));
            let mut cache = cache.borrow_mut();
            cache.pending.remove(&key);
            cache.failed.insert(key);
        });
        img.set_onerror(Some(onerror.unchecked_ref()));

        img.set_src(src);
    }
}

impl DesignEngine {
    /// Kicks off decodes for every image element whose source has not been
    /// requested yet. Called at the top of each render pass.
    pub(crate) fn queue_image_decodes(&self) {
        let srcs: Vec<String> = self
            .elements
            .iter()
            .filter_map(|el| match &el.kind {
                ElementKind::Image { src, .. } if !src.is_empty() => Some(src.clone()),
                _ => None,
            })
            .collect();
        for src in srcs {
            self.request_image(&src);
        }
    }
}

/// Data URLs can be hundreds of kilobytes; keep log lines readable.
#[cfg(target_arch = "wasm32")]
fn truncate_src(src: &str) -> &str {
    let end = src.char_indices().nth(64).map(|(i, _)| i).unwrap_or(src.len());
    &src[..end]
}
