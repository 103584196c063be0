use leptos::logging::log;
use leptos::prelude::*;
use quizhub_frontend::App;

// WASM 体积优化：单线程空闲链表分配器
#[cfg(target_arch = "wasm32")]
use lol_alloc::{AssumeSingleThreaded, FreeListAllocator};

#[cfg(target_arch = "wasm32")]
#[global_allocator]
static ALLOCATOR: AssumeSingleThreaded<FreeListAllocator> =
    unsafe { AssumeSingleThreaded::new(FreeListAllocator::new()) };

pub fn main() {
    console_error_panic_hook::set_once();
    log!("[QuizHub] v{} starting", env!("CARGO_PKG_VERSION"));
    mount_to_body(App);
}
