// Generated by docproxy. DO NOT EDIT.
// stand-in: Proxies::__CG__::app::User
// target: app::User
// checksum: sha256:d811cec4d4d49b0de9b5aef922a9e63fc4516bd82fb163030f262412ffd1ce17
//! Stand-in `Proxies::__CG__::app::User` for `app::User` in namespace `Proxies`

/// Lazily loaded `app::User`
#[derive(Debug, Clone)]
pub struct User {
    proxy: ::docproxy::Proxy,
}

impl User {
    pub const TARGET: &'static str = "app::User";
    pub const STAND_IN: &'static str = "Proxies::__CG__::app::User";

    /// Wrap `proxy` when it stands in for `app::User`
    pub fn new(proxy: ::docproxy::Proxy) -> Option<Self> {
        (proxy.class().name() == Self::TARGET).then(|| Self { proxy })
    }

    pub fn proxy(&self) -> &::docproxy::Proxy {
        &self.proxy
    }

    /// Force initialization
    pub fn load(&self) -> ::docproxy::ProxyResult<()> {
        self.proxy.load()
    }

    /// Never loads
    pub fn is_initialized(&self) -> bool {
        self.proxy.is_initialized()
    }

    /// Identifier `id`; never loads
    pub fn id(&self) -> Option<&::docproxy::Value> {
        self.proxy.identifier().get("id")
    }

    pub fn name(&self) -> ::docproxy::ProxyResult<Option<::docproxy::Value>> {
        self.proxy.get("name")
    }

    pub fn set_name(&self, value: ::docproxy::Value) -> ::docproxy::ProxyResult<()> {
        self.proxy.set("name", value)
    }


    /// Serialize as the real `app::User` would be; never loads
    pub fn serialize(&self) -> ::docproxy::proxy::Serialized {
        const SERIALIZE_FIELDS: &[&str] = &["name", "nickname"];
        let mut properties = self.proxy.slots();
        properties.remove(&::docproxy::proxy::lazy_state_slot(self.proxy.stand_in_name()));
        ::docproxy::proxy::select_fields(Self::TARGET, &properties, SERIALIZE_FIELDS)
    }
}
