use netcycle_base::{ErrorCode, NetcycleError, ABI_VERSION};

use crate::mem::{write_error_out, write_out};

#[unsafe(no_mangle)]
pub extern "C" fn netcycle_abi_version() -> u32 {
    ABI_VERSION
}

#[unsafe(no_mangle)]
#[allow(clippy::missing_safety_doc)]
pub unsafe extern "C" fn netcycle_list_json(out_ptr: *mut *mut u8, out_len: *mut usize) -> i32 {
    if out_ptr.is_null() || out_len.is_null() {
        return ErrorCode::InvalidArgument.as_i32();
    }

    match netcycle_sys::netif::list_json_bytes() {
        Ok(buf) => {
            unsafe {
                write_out(out_ptr, out_len, buf);
            }
            0
        }
        Err(e) => {
            write_error_out(out_ptr, out_len, &e);
            e.code.as_i32()
        }
    }
}

/// 阻塞直到重启流程结束。返回值为 `ErrorCode`；重启失败时输出缓冲区仍是完整的
/// `RestartResponse`，其中 `error.phase` / `error.adapter_down` 指明网卡是否已停用。
#[unsafe(no_mangle)]
#[allow(clippy::missing_safety_doc)]
pub unsafe extern "C" fn netcycle_restart_json(
    req_ptr: *const u8,
    req_len: usize,
    out_ptr: *mut *mut u8,
    out_len: *mut usize,
) -> i32 {
    if out_ptr.is_null() || out_len.is_null() {
        return ErrorCode::InvalidArgument.as_i32();
    }
    if req_ptr.is_null() || req_len == 0 {
        let e = NetcycleError::invalid_argument("请求为空");
        write_error_out(out_ptr, out_len, &e);
        return e.code.as_i32();
    }

    let req_bytes = unsafe { std::slice::from_raw_parts(req_ptr, req_len) };
    let req_str = match std::str::from_utf8(req_bytes) {
        Ok(s) => s,
        Err(e) => {
            let err = NetcycleError::invalid_argument(format!("请求不是 UTF-8: {e}"));
            write_error_out(out_ptr, out_len, &err);
            return err.code.as_i32();
        }
    };

    let resp = match netcycle_sys::netif::restart_json(req_str) {
        Ok(resp) => resp,
        Err(e) => {
            write_error_out(out_ptr, out_len, &e);
            return e.code.as_i32();
        }
    };

    match serde_json::to_vec(&resp) {
        Ok(buf) => {
            unsafe {
                write_out(out_ptr, out_len, buf);
            }
            resp.code().as_i32()
        }
        Err(e) => {
            let err = NetcycleError::system_error(format!("序列化 restart 响应失败: {e}"));
            write_error_out(out_ptr, out_len, &err);
            err.code.as_i32()
        }
    }
}

#[unsafe(no_mangle)]
#[allow(clippy::missing_safety_doc)]
pub unsafe extern "C" fn netcycle_free(ptr: *mut u8, len: usize) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)));
    }
}
