/// Declares a 12-byte opaque identifier whose canonical form is 24 hex digits.
macro_rules! object_id {
    (
        $(#[$id_meta:meta])*
        $vis:vis struct $name:ident;
    ) => {
        $(#[$id_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis struct $name([u8; 12]);

        impl $name {
            pub fn from_bytes(bytes: [u8; 12]) -> Self {
                Self(bytes)
            }

            pub fn bytes(&self) -> [u8; 12] {
                self.0
            }

            pub fn generate() -> Self {
                Self(rand::random())
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::database::models::InvalidObjectId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut bytes = [0u8; 12];
                hex::decode_to_slice(s, &mut bytes)
                    .map_err(|_| $crate::database::models::InvalidObjectId(s.to_string()))?;
                Ok(Self(bytes))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as serde::Deserialize>::deserialize(deserializer)?;
                value.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use object_id;
