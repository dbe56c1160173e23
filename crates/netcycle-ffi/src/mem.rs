use netcycle_base::{NetcycleError, ABI_VERSION};

pub(crate) fn write_error_out(out_ptr: *mut *mut u8, out_len: *mut usize, e: &NetcycleError) {
    let v = serde_json::json!({ "abi": ABI_VERSION, "ok": false, "error": e });
    let buf = serde_json::to_vec(&v).unwrap_or_else(|_| b"{\"ok\":false}".to_vec());
    unsafe {
        write_out(out_ptr, out_len, buf);
    }
}

/// 把 `buf` 的所有权交给调用方，调用方必须用 `netcycle_free(ptr, len)` 释放。
pub(crate) unsafe fn write_out(out_ptr: *mut *mut u8, out_len: *mut usize, buf: Vec<u8>) {
    let mut buf = buf.into_boxed_slice();
    let len = buf.len();
    let ptr = buf.as_mut_ptr();
    std::mem::forget(buf);
    unsafe {
        *out_ptr = ptr;
        *out_len = len;
    }
}
