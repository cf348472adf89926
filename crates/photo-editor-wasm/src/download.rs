//! Hand encoded bytes to the browser as a file download.

use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Offer `bytes` to the user as a download named `file_name`.
///
/// Wraps the bytes in a `Blob`, points a temporary anchor at an object URL
/// for it and clicks the anchor. The object URL is revoked afterwards.
pub fn save_bytes(bytes: &[u8], file_name: &str, mime_type: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let url = Url::create_object_url_with_blob(&blob)?;
    let clicked = click_download_link(&url, file_name);
    Url::revoke_object_url(&url)?;
    clicked
}

fn click_download_link(url: &str, file_name: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    anchor.set_href(url);
    anchor.set_download(file_name);
    anchor.click();
    log::info!("download of {file_name} started");
    Ok(())
}
