use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, FnArg, ItemFn, LitInt, Pat};

/// Time a spatial system when the `perf_stats` feature is enabled.
///
/// The function body is wrapped in a drop guard that reports how long the
/// call took. Without `perf_stats` the guard is not emitted at all, so the
/// attribute costs nothing in normal builds.
///
/// A system taking `frame: Res<FrameCount>` additionally reports every
/// 100th frame, regardless of how fast it ran.
///
/// ```ignore
/// #[profile]
/// pub fn sync_occupancy(grid: ResMut<NavigationGrid>, frame: Res<FrameCount>) {
///     // ...
/// }
///
/// #[profile(4)] // only report calls slower than 4ms
/// pub fn process_path_requests() { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn profile(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    let threshold_ms: u128 = if attr.is_empty() {
        1
    } else {
        match syn::parse::<LitInt>(attr) {
            Ok(lit) => lit.base10_parse().unwrap_or(1),
            Err(err) => return err.to_compile_error().into(),
        }
    };

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let fn_name_str = sig.ident.to_string();

    let has_frame_param = sig.inputs.iter().any(|arg| {
        let FnArg::Typed(pat_type) = arg else {
            return false;
        };
        let Pat::Ident(pat_ident) = &*pat_type.pat else {
            return false;
        };
        let ty = &pat_type.ty;
        pat_ident.ident == "frame" && quote!(#ty).to_string().contains("FrameCount")
    });

    let frame_init = if has_frame_param {
        quote! { Some(frame.0) }
    } else {
        quote! { None }
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            #[cfg(feature = "perf_stats")]
            let _profile_timer = {
                struct ProfileGuard {
                    name: &'static str,
                    start: std::time::Instant,
                    frame: Option<u32>,
                }
                impl Drop for ProfileGuard {
                    fn drop(&mut self) {
                        let elapsed = self.start.elapsed();
                        let periodic = self.frame.is_some_and(|f| f % 100 == 0);
                        if elapsed.as_millis() > #threshold_ms || periodic {
                            bevy::prelude::info!("[PERF] {}: {:?} (frame {:?})", self.name, elapsed, self.frame);
                        }
                    }
                }
                ProfileGuard {
                    name: #fn_name_str,
                    start: std::time::Instant::now(),
                    frame: #frame_init,
                }
            };

            #block
        }
    };

    output.into()
}
