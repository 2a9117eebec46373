/// Declares the opcode table.
///
/// ```ignore
/// opcode_table! {
///     OpName<value> "OP_ASM_NAME",
/// }
/// ```
///
/// Expands into a `codes` module with one `u8` constant per opcode and a
/// `name_of` function used when rendering scripts as ASM.
macro_rules! opcode_table {
    ($($name:ident<$value:literal> $asm:literal,)*) => {
        #[allow(non_upper_case_globals)]
        pub mod codes {
            $(pub const $name: u8 = $value;)*
        }

        /// ASM name of a non-push opcode, `None` for unassigned values.
        pub fn name_of(opcode: u8) -> Option<&'static str> {
            match opcode {
                $($value => Some($asm),)*
                _ => None,
            }
        }
    };
}
