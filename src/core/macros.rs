//! 核心宏定义

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use scene_runtime::impl_default;
///
/// struct SpriteGrid {
///     rows: u32,
///     columns: u32,
/// }
///
/// impl_default!(SpriteGrid {
///     rows: 1,
///     columns: 1,
/// });
///
/// assert_eq!(SpriteGrid::default().rows, 1);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
