/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */

// Generates a `bool` accessor for each `Option<bool>` flag field, treating unset as false.
macro_rules! flag_accessors {
    ( $t:ty { $( $(#[$m:meta])* $field:ident ),* $(,)? } ) => {
        impl $t {
            $(
                $(#[$m])*
                pub fn $field(&self) -> bool {
                    self.$field.unwrap_or(false)
                }
            )*
        }
    };
}

pub(crate) use flag_accessors;
