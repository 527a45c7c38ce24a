//! Assembles small classfiles for fixtures.
//!
//! Only what [`ClassFile::parse`](crate::ClassFile::parse) reads is emitted: a constant pool of
//! `Utf8`/`Class` entries, the header, methods without code, and `Signature` attributes.

use std::collections::HashMap;

use crate::classfile::{ACC_ABSTRACT, ACC_INTERFACE, ACC_PUBLIC};

#[derive(Debug, Clone)]
struct MethodSpec {
    access_flags: u16,
    name: String,
    descriptor: String,
    signature: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClassWriter {
    access_flags: u16,
    this_class: String,
    super_class: Option<String>,
    interfaces: Vec<String>,
    signature: Option<String>,
    methods: Vec<MethodSpec>,
}

impl ClassWriter {
    /// `public interface <internal_name>`
    pub fn interface(internal_name: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT,
            this_class: internal_name.to_string(),
            super_class: Some("java/lang/Object".to_string()),
            interfaces: Vec::new(),
            signature: None,
            methods: Vec::new(),
        }
    }

    /// `public class <internal_name>`
    pub fn class(internal_name: &str) -> Self {
        Self {
            access_flags: ACC_PUBLIC,
            ..Self::interface(internal_name)
        }
    }

    pub fn access_flags(mut self, flags: u16) -> Self {
        self.access_flags = flags;
        self
    }

    pub fn super_class(mut self, internal_name: &str) -> Self {
        self.super_class = Some(internal_name.to_string());
        self
    }

    pub fn implements(mut self, internal_name: &str) -> Self {
        self.interfaces.push(internal_name.to_string());
        self
    }

    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    pub fn method(
        mut self,
        access_flags: u16,
        name: &str,
        descriptor: &str,
        signature: Option<&str>,
    ) -> Self {
        self.methods.push(MethodSpec {
            access_flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: signature.map(str::to_string),
        });
        self
    }

    /// Shorthand for a `public abstract` method.
    pub fn abstract_method(self, name: &str, descriptor: &str, signature: Option<&str>) -> Self {
        self.method(ACC_PUBLIC | ACC_ABSTRACT, name, descriptor, signature)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut pool = PoolBuilder::default();
        let this_class = pool.class(&self.this_class);
        let super_class = self.super_class.as_deref().map(|s| pool.class(s)).unwrap_or(0);
        let interfaces: Vec<u16> = self.interfaces.iter().map(|i| pool.class(i)).collect();
        let signature_attr = (self.signature.is_some()
            || self.methods.iter().any(|m| m.signature.is_some()))
        .then(|| pool.utf8("Signature"));
        let class_signature = self.signature.as_deref().map(|s| pool.utf8(s));
        let methods: Vec<(u16, u16, u16, Option<u16>)> = self
            .methods
            .iter()
            .map(|m| {
                (
                    m.access_flags,
                    pool.utf8(&m.name),
                    pool.utf8(&m.descriptor),
                    m.signature.as_deref().map(|s| pool.utf8(s)),
                )
            })
            .collect();

        let mut out = Vec::new();
        put_u4(&mut out, 0xCAFEBABE);
        put_u2(&mut out, 0);
        put_u2(&mut out, 52);
        pool.write(&mut out);

        put_u2(&mut out, self.access_flags);
        put_u2(&mut out, this_class);
        put_u2(&mut out, super_class);
        put_u2(&mut out, interfaces.len() as u16);
        for iface in interfaces {
            put_u2(&mut out, iface);
        }

        put_u2(&mut out, 0); // fields
        put_u2(&mut out, methods.len() as u16);
        for (flags, name, descriptor, signature) in methods {
            put_u2(&mut out, flags);
            put_u2(&mut out, name);
            put_u2(&mut out, descriptor);
            write_signature(&mut out, signature_attr, signature);
        }
        write_signature(&mut out, signature_attr, class_signature);
        out
    }
}

fn write_signature(out: &mut Vec<u8>, attr_name: Option<u16>, signature: Option<u16>) {
    match (attr_name, signature) {
        (Some(attr_name), Some(signature)) => {
            put_u2(out, 1);
            put_u2(out, attr_name);
            put_u4(out, 2);
            put_u2(out, signature);
        }
        _ => put_u2(out, 0),
    }
}

#[derive(Default)]
struct PoolBuilder {
    bytes: Vec<u8>,
    count: u16,
    utf8: HashMap<String, u16>,
    classes: HashMap<String, u16>,
}

impl PoolBuilder {
    fn utf8(&mut self, value: &str) -> u16 {
        if let Some(idx) = self.utf8.get(value) {
            return *idx;
        }
        self.bytes.push(1);
        put_u2(&mut self.bytes, value.len() as u16);
        self.bytes.extend_from_slice(value.as_bytes());
        self.count += 1;
        self.utf8.insert(value.to_string(), self.count);
        self.count
    }

    fn class(&mut self, internal_name: &str) -> u16 {
        if let Some(idx) = self.classes.get(internal_name) {
            return *idx;
        }
        let name_index = self.utf8(internal_name);
        self.bytes.push(7);
        put_u2(&mut self.bytes, name_index);
        self.count += 1;
        self.classes.insert(internal_name.to_string(), self.count);
        self.count
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_u2(out, self.count + 1);
        out.extend_from_slice(&self.bytes);
    }
}

fn put_u2(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u4(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}
