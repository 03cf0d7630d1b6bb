// @generated
// This file is @generated by prost-build from openconfig gnmi.proto (v0.10.0),
// restricted to the messages used by the Subscribe RPC.
/// Notification is a re-usable message that is used to encode data from the
/// target to the client.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Notification {
    /// Timestamp in nanoseconds since Epoch.
    #[prost(int64, tag = "1")]
    pub timestamp: i64,
    /// Prefix used for paths in the message.
    #[prost(message, optional, tag = "2")]
    pub prefix: ::core::option::Option<Path>,
    /// Data elements that have changed values.
    #[prost(message, repeated, tag = "4")]
    pub update: ::prost::alloc::vec::Vec<Update>,
    /// Data elements that have been deleted.
    #[prost(message, repeated, tag = "5")]
    pub delete: ::prost::alloc::vec::Vec<Path>,
    /// This notification contains a set of paths that are always updated together.
    #[prost(bool, tag = "6")]
    pub atomic: bool,
}
/// Update is a re-usable message that is used to store a particular Path,
/// Value pair.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Update {
    /// The path (key) for the update.
    #[prost(message, optional, tag = "1")]
    pub path: ::core::option::Option<Path>,
    /// The explicitly typed update value.
    #[prost(message, optional, tag = "3")]
    pub val: ::core::option::Option<TypedValue>,
    /// Number of coalesced duplicates.
    #[prost(uint32, tag = "4")]
    pub duplicates: u32,
}
/// TypedValue is used to encode a value being sent between the client and
/// target (originated by either entity).
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TypedValue {
    /// One of the fields within the val oneof is populated with the value
    /// of the update. The type of the value being included in the Update
    /// determines which field should be populated.
    #[prost(
        oneof = "typed_value::Value",
        tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14"
    )]
    pub value: ::core::option::Option<typed_value::Value>,
}
/// Nested message and enum types in `TypedValue`.
pub mod typed_value {
    /// One of the fields within the val oneof is populated with the value
    /// of the update. The type of the value being included in the Update
    /// determines which field should be populated.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        /// String value.
        #[prost(string, tag = "1")]
        StringVal(::prost::alloc::string::String),
        /// Integer value.
        #[prost(int64, tag = "2")]
        IntVal(i64),
        /// Unsigned integer value.
        #[prost(uint64, tag = "3")]
        UintVal(u64),
        /// Bool value.
        #[prost(bool, tag = "4")]
        BoolVal(bool),
        /// Arbitrary byte sequence value.
        #[prost(bytes, tag = "5")]
        BytesVal(::prost::alloc::vec::Vec<u8>),
        /// Deprecated - use double_val.
        #[prost(float, tag = "6")]
        FloatVal(f32),
        /// Deprecated - use double_val.
        #[prost(message, tag = "7")]
        DecimalVal(super::Decimal64),
        /// Mixed type scalar array value.
        #[prost(message, tag = "8")]
        LeaflistVal(super::ScalarArray),
        /// protobuf.Any encoded bytes.
        #[prost(message, tag = "9")]
        AnyVal(::prost_types::Any),
        /// JSON-encoded text.
        #[prost(bytes, tag = "10")]
        JsonVal(::prost::alloc::vec::Vec<u8>),
        /// JSON-encoded text per RFC7951.
        #[prost(bytes, tag = "11")]
        JsonIetfVal(::prost::alloc::vec::Vec<u8>),
        /// Arbitrary ASCII text.
        #[prost(string, tag = "12")]
        AsciiVal(::prost::alloc::string::String),
        /// Protobuf binary encoded bytes. The message type is not included.
        #[prost(bytes, tag = "13")]
        ProtoBytes(::prost::alloc::vec::Vec<u8>),
        /// Floating point value.
        #[prost(double, tag = "14")]
        DoubleVal(f64),
    }
}
/// Path encodes a data tree path as a series of repeated strings, with
/// each element of the path representing a data tree node name and the
/// associated attributes.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Path {
    /// Label to disambiguate path.
    #[prost(string, tag = "2")]
    pub origin: ::prost::alloc::string::String,
    /// Elements of the path.
    #[prost(message, repeated, tag = "3")]
    pub elem: ::prost::alloc::vec::Vec<PathElem>,
    /// The name of the target
    #[prost(string, tag = "4")]
    pub target: ::prost::alloc::string::String,
}
/// PathElem encodes an element of a gNMI path, along with any attributes (keys)
/// that may be associated with it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PathElem {
    /// The name of the element in the path.
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    /// Map of key (attribute) name to value.
    #[prost(btree_map = "string, string", tag = "2")]
    pub key: ::prost::alloc::collections::BTreeMap<
        ::prost::alloc::string::String,
        ::prost::alloc::string::String,
    >,
}
/// Decimal64 is used to encode a fixed precision decimal number.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Decimal64 {
    /// Set of digits.
    #[prost(int64, tag = "1")]
    pub digits: i64,
    /// Number of digits following the decimal point.
    #[prost(uint32, tag = "2")]
    pub precision: u32,
}
/// ScalarArray is used to encode a mixed-type array of values.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ScalarArray {
    /// The set of elements within the array. Each TypedValue message should
    /// specify only elements that have a field identifier of 1-7 (i.e., the
    /// values are scalar values).
    #[prost(message, repeated, tag = "1")]
    pub element: ::prost::alloc::vec::Vec<TypedValue>,
}
/// SubscribeRequest is the message sent by the client to the target when
/// initiating a subscription to a set of paths within the data tree.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubscribeRequest {
    #[prost(oneof = "subscribe_request::Request", tags = "1, 3")]
    pub request: ::core::option::Option<subscribe_request::Request>,
}
/// Nested message and enum types in `SubscribeRequest`.
pub mod subscribe_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Request {
        /// Specify the paths within a subscription.
        #[prost(message, tag = "1")]
        Subscribe(super::SubscriptionList),
        /// Trigger a polled update.
        #[prost(message, tag = "3")]
        Poll(super::Poll),
    }
}
/// Poll is sent within a SubscribeRequest to trigger the device to
/// send telemetry updates for the paths that are associated with the
/// subscriptions within the SubscriptionList.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Poll {}
/// SubscribeResponse is the message used by the target within a Subscribe RPC.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubscribeResponse {
    #[prost(oneof = "subscribe_response::Response", tags = "1, 3, 4")]
    pub response: ::core::option::Option<subscribe_response::Response>,
}
/// Nested message and enum types in `SubscribeResponse`.
pub mod subscribe_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Response {
        /// Changed or sampled value for a path.
        #[prost(message, tag = "1")]
        Update(super::Notification),
        /// Indicate target has sent all values associated with the
        /// subscription at least once.
        #[prost(bool, tag = "3")]
        SyncResponse(bool),
        /// Deprecated in favour of google.golang.org/genproto/googleapis/rpc/status
        #[prost(message, tag = "4")]
        Error(super::Error),
    }
}
/// Error message previously utilised to return errors to the client. Deprecated
/// in favour of using the google.golang.org/genproto/googleapis/rpc/status
/// message in the RPC response.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Error {
    /// Canonical gRPC error code.
    #[prost(uint32, tag = "1")]
    pub code: u32,
    /// Human readable error.
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
    /// Optional additional information.
    #[prost(message, optional, tag = "3")]
    pub data: ::core::option::Option<::prost_types::Any>,
}
/// SubscriptionList is used within a Subscribe message to specify the list of
/// paths that the client wishes to subscribe to.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SubscriptionList {
    /// Prefix used for paths.
    #[prost(message, optional, tag = "1")]
    pub prefix: ::core::option::Option<Path>,
    /// Set of subscriptions to create.
    #[prost(message, repeated, tag = "2")]
    pub subscription: ::prost::alloc::vec::Vec<Subscription>,
    /// DSCP marking to be used.
    #[prost(message, optional, tag = "4")]
    pub qos: ::core::option::Option<QosMarking>,
    #[prost(enumeration = "subscription_list::Mode", tag = "5")]
    pub mode: i32,
    /// Whether elements of the schema that are marked as eligible for aggregation
    /// should be aggregated or not.
    #[prost(bool, tag = "6")]
    pub allow_aggregation: bool,
    /// The set of schemas that define the elements of the data tree that should
    /// be sent by the target.
    #[prost(message, repeated, tag = "7")]
    pub use_models: ::prost::alloc::vec::Vec<ModelData>,
    /// The encoding that the target should use within the Notifications generated
    /// corresponding to the SubscriptionList.
    #[prost(enumeration = "Encoding", tag = "8")]
    pub encoding: i32,
    /// An optional field to specify that only updates to current state should be
    /// sent to a client.
    #[prost(bool, tag = "9")]
    pub updates_only: bool,
}
/// Nested message and enum types in `SubscriptionList`.
pub mod subscription_list {
    /// Mode of the subscription.
    #[derive(
        Clone,
        Copy,
        Debug,
        PartialEq,
        Eq,
        Hash,
        PartialOrd,
        Ord,
        ::prost::Enumeration
    )]
    #[repr(i32)]
    pub enum Mode {
        /// Values streamed by the target (Sec. 3.5.1.5.2).
        Stream = 0,
        /// Values sent once-off by the target (Sec. 3.5.1.5.1).
        Once = 1,
        /// Values sent in response to a poll request (Sec. 3.5.1.5.3).
        Poll = 2,
    }
    impl Mode {
        /// String value of the enum field names used in the ProtoBuf definition.
        pub fn as_str_name(&self) -> &'static str {
            match self {
                Self::Stream => "STREAM",
                Self::Once => "ONCE",
                Self::Poll => "POLL",
            }
        }
        /// Creates an enum from field names used in the ProtoBuf definition.
        pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
            match value {
                "STREAM" => Some(Self::Stream),
                "ONCE" => Some(Self::Once),
                "POLL" => Some(Self::Poll),
                _ => None,
            }
        }
    }
}
/// Subscription is a single request within a SubscriptionList. The path
/// specified is interpreted (along with the prefix) as the elements of the data
/// tree that the client is subscribing to.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Subscription {
    /// The data tree path.
    #[prost(message, optional, tag = "1")]
    pub path: ::core::option::Option<Path>,
    /// Subscription mode to be used.
    #[prost(enumeration = "SubscriptionMode", tag = "2")]
    pub mode: i32,
    /// ns between samples in SAMPLE mode.
    #[prost(uint64, tag = "3")]
    pub sample_interval: u64,
    /// Indicates whether values that have not changed should be sent in a SAMPLE
    /// subscription.
    #[prost(bool, tag = "4")]
    pub suppress_redundant: bool,
    /// Specifies the maximum allowable silent period in nanoseconds when
    /// suppress_redundant is in use.
    #[prost(uint64, tag = "5")]
    pub heartbeat_interval: u64,
}
/// QOSMarking specifies the DSCP value to be set on transmitted telemetry
/// updates from the target.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct QosMarking {
    #[prost(uint32, tag = "1")]
    pub marking: u32,
}
/// ModelData is used to describe a set of schema modules.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModelData {
    /// Name of the model.
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    /// Organization publishing the model.
    #[prost(string, tag = "2")]
    pub organization: ::prost::alloc::string::String,
    /// Semantic version of the model.
    #[prost(string, tag = "3")]
    pub version: ::prost::alloc::string::String,
}
/// Encoding defines the value encoding formats that are supported by the gNMI
/// protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Encoding {
    /// JSON encoded text.
    Json = 0,
    /// Arbitrarily encoded bytes.
    Bytes = 1,
    /// Encoded according to scalar values of TypedValue.
    Proto = 2,
    /// ASCII text of an out-of-band agreed format.
    Ascii = 3,
    /// JSON encoded text as per RFC7951.
    JsonIetf = 4,
}
impl Encoding {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Bytes => "BYTES",
            Self::Proto => "PROTO",
            Self::Ascii => "ASCII",
            Self::JsonIetf => "JSON_IETF",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "JSON" => Some(Self::Json),
            "BYTES" => Some(Self::Bytes),
            "PROTO" => Some(Self::Proto),
            "ASCII" => Some(Self::Ascii),
            "JSON_IETF" => Some(Self::JsonIetf),
            _ => None,
        }
    }
}
/// SubscriptionMode is the mode of the subscription, specifying how the
/// target must return values in a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SubscriptionMode {
    /// The target selects the relevant mode for each element.
    TargetDefined = 0,
    /// The target sends an update on element value change.
    OnChange = 1,
    /// The target samples values according to the interval.
    Sample = 2,
}
impl SubscriptionMode {
    /// String value of the enum field names used in the ProtoBuf definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::TargetDefined => "TARGET_DEFINED",
            Self::OnChange => "ON_CHANGE",
            Self::Sample => "SAMPLE",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "TARGET_DEFINED" => Some(Self::TargetDefined),
            "ON_CHANGE" => Some(Self::OnChange),
            "SAMPLE" => Some(Self::Sample),
            _ => None,
        }
    }
}
