// logtools - core/caller.rs
//
// Compile-time capture of the calling function's name for the `function`
// field. The macro expands at the call site, so the name comes from the
// item path the compiler already knows; nothing walks the stack.

/// Name of the enclosing function, `"Type.method"` inside methods.
///
/// Closure frames are skipped, so a call inside a closure reports the
/// function that contains the closure.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::core::caller::caller_from_path(__type_name_of(__here))
    }};
}

/// An [`ExtraRecord`](crate::core::model::ExtraRecord) with `function`
/// pre-filled from [`function_name!`]. Chain setters to fill the rest.
#[macro_export]
macro_rules! extra {
    () => {
        $crate::core::model::ExtraRecord::new().function($crate::function_name!())
    };
}

/// Reduce a compiler item path to the `function` field text.
///
/// `crate::module::Type::method::__here` becomes `Type.method`,
/// `crate::module::free_fn::__here` becomes `free_fn`. Generic arguments
/// are dropped and `<Type as Trait>` resolves to `Type`.
pub fn caller_from_path(path: &str) -> String {
    let path = path.strip_suffix("::__here").unwrap_or(path);
    let path = resolve_qualified_self(path);
    let path = strip_generics(&path);

    let segments: Vec<&str> = path
        .split("::")
        .filter(|s| !s.is_empty() && *s != "{{closure}}")
        .collect();

    match segments.as_slice() {
        [.., owner, method] if owner.starts_with(char::is_uppercase) => {
            format!("{owner}.{method}")
        }
        [.., name] => (*name).to_string(),
        [] => String::new(),
    }
}

/// `<a::Type as b::Trait>::m` -> `a::Type::m`.
fn resolve_qualified_self(path: &str) -> String {
    if !path.starts_with('<') {
        return path.to_string();
    }
    let mut depth = 0usize;
    for (i, c) in path.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    let inner = &path[1..i];
                    let self_ty = inner.split(" as ").next().unwrap_or(inner);
                    return format!("{self_ty}{}", &path[i + 1..]);
                }
            }
            _ => {}
        }
    }
    path.to_string()
}

fn strip_generics(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut depth = 0usize;
    for c in path.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
