/// Declares a register map as a `#[repr(u8)]` enum plus a slice of every entry,
/// with `Register`/`NamedRegister` impls and a `<Enum>_Stringify_From_u8` lookup.
#[macro_export]
macro_rules! registers {
    (
        $enum_name:ident, $slice_name:ident {
            $($name:ident = $val:expr),* $(,)?
        }
    ) => {
        #[repr(u8)]
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum $enum_name {
            $($name = $val),*
        }

        pub const $slice_name: &[$enum_name] = &[
            $($enum_name::$name),*
        ];

        impl $enum_name {
            pub fn name(&self) -> &'static str {
                match self {
                    $($enum_name::$name => stringify!($name),)*
                }
            }
        }

        impl $crate::registers::Register for $enum_name {
            fn addr(self) -> u8 {
                self as u8
            }
        }

        impl $crate::registers::NamedRegister for $enum_name {
            fn name(&self) -> &'static str {
                $enum_name::name(self)
            }
        }

        impl From<$enum_name> for u8 {
            fn from(r: $enum_name) -> u8 {
                r as u8
            }
        }

        $crate::__paste::paste! {
            #[allow(non_snake_case)]
            pub fn [<$enum_name _Stringify_From_u8>](value: u8) -> Option<&'static str> {
                use $crate::registers::Register;
                $slice_name.iter().find(|r| r.addr() == value).map(|r| r.name())
            }
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegOp {
    Read,
    Write,
}

pub trait NamedRegister: Register {
    fn name(&self) -> &'static str;
}

pub trait Register: Copy {
    fn addr(self) -> u8;
}

pub struct RegConfig<R: Register> {
    pub op: RegOp,
    pub reg: R,
    pub value: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::registers! {
        DemoReg, DEMO_REGS {
            WhoAmI = 0x0F,
            Ctrl1  = 0x20,
        }
    }

    #[test]
    fn macro_generates_addresses_and_names() {
        assert_eq!(DemoReg::Ctrl1.addr(), 0x20);
        assert_eq!(u8::from(DemoReg::WhoAmI), 0x0F);
        assert_eq!(NamedRegister::name(&DemoReg::Ctrl1), "Ctrl1");
        assert_eq!(DEMO_REGS.len(), 2);
    }

    #[test]
    fn lookup_by_address() {
        assert_eq!(DemoReg_Stringify_From_u8(0x0F), Some("WhoAmI"));
        assert_eq!(DemoReg_Stringify_From_u8(0x55), None);
    }
}
