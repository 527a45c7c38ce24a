use crate::store::{ClassDef, ClassKind, MethodDef, TypeParamDef, TypeStore};
use crate::ty::{PrimitiveType, TypeRef};
use crate::JAVA_LANG_OBJECT;

fn tv(name: &str) -> TypeRef {
    TypeRef::TypeVar(name.to_string())
}

fn generic(name: &str, kind: ClassKind, params: &[&str]) -> ClassDef {
    let mut def = ClassDef::new(name, kind);
    def.type_params = params.iter().map(|p| TypeParamDef::new(*p)).collect();
    if kind != ClassKind::Interface {
        def.super_class = Some(TypeRef::object());
    }
    def
}

fn implementing(mut def: ClassDef, interfaces: Vec<TypeRef>) -> ClassDef {
    def.interfaces = interfaces;
    def
}

fn object_methods() -> Vec<MethodDef> {
    vec![
        MethodDef::new(
            "equals",
            vec![TypeRef::object()],
            TypeRef::Primitive(PrimitiveType::Boolean),
        ),
        MethodDef::new("hashCode", vec![], TypeRef::Primitive(PrimitiveType::Int)),
        MethodDef::new("toString", vec![], TypeRef::raw("java.lang.String")),
        MethodDef::new(
            "getClass",
            vec![],
            TypeRef::class(
                "java.lang.Class",
                vec![TypeRef::Wildcard(crate::WildcardBound::Unbounded)],
            ),
        ),
    ]
}

/// True for a signature that overrides one of `java.lang.Object`'s public instance methods.
pub fn is_object_method(method: &MethodDef) -> bool {
    match (method.name.as_str(), method.params.as_slice()) {
        ("equals", [param]) => param.is_object(),
        ("hashCode" | "toString" | "getClass", []) => true,
        _ => false,
    }
}

impl TypeStore {
    /// A store pre-populated with the handful of JDK types the matcher reasons about when no
    /// runtime jar is on the classpath: `Object`, `String`, the boxes, and the core
    /// collection interfaces.
    pub fn with_minimal_jdk() -> Self {
        let mut store = TypeStore::new();

        let mut object = ClassDef::new(JAVA_LANG_OBJECT, ClassKind::Class);
        object.methods = object_methods();
        store.upsert_class(object);

        let serializable = || TypeRef::raw("java.io.Serializable");
        let comparable_of = |name: &str| {
            TypeRef::class("java.lang.Comparable", vec![TypeRef::raw(name)])
        };

        for iface in [
            "java.io.Serializable",
            "java.lang.Cloneable",
            "java.lang.CharSequence",
            "java.lang.Runnable",
            "java.lang.AutoCloseable",
            "java.util.RandomAccess",
        ] {
            store.upsert_class(ClassDef::new(iface, ClassKind::Interface));
        }
        store.upsert_class(implementing(
            ClassDef::new("java.io.Closeable", ClassKind::Interface),
            vec![TypeRef::raw("java.lang.AutoCloseable")],
        ));

        store.upsert_class(generic("java.lang.Comparable", ClassKind::Interface, &["T"]));
        store.upsert_class(generic("java.lang.Iterable", ClassKind::Interface, &["T"]));
        store.upsert_class(generic("java.lang.Class", ClassKind::Class, &["T"]));
        store.upsert_class(generic("java.util.Iterator", ClassKind::Interface, &["E"]));
        store.upsert_class(implementing(
            generic("java.util.Collection", ClassKind::Interface, &["E"]),
            vec![TypeRef::class("java.lang.Iterable", vec![tv("E")])],
        ));
        for iface in ["java.util.List", "java.util.Set", "java.util.Queue"] {
            store.upsert_class(implementing(
                generic(iface, ClassKind::Interface, &["E"]),
                vec![TypeRef::class("java.util.Collection", vec![tv("E")])],
            ));
        }
        store.upsert_class(generic("java.util.Map", ClassKind::Interface, &["K", "V"]));
        store.upsert_class(generic("java.util.Map.Entry", ClassKind::Interface, &["K", "V"]));
        store.upsert_class(generic("java.util.Optional", ClassKind::Class, &["T"]));

        for (class, iface) in [
            ("java.util.ArrayList", "java.util.List"),
            ("java.util.LinkedList", "java.util.List"),
            ("java.util.HashSet", "java.util.Set"),
            ("java.util.TreeSet", "java.util.Set"),
        ] {
            store.upsert_class(implementing(
                generic(class, ClassKind::Class, &["E"]),
                vec![TypeRef::class(iface, vec![tv("E")]), serializable()],
            ));
        }
        for class in ["java.util.HashMap", "java.util.TreeMap", "java.util.LinkedHashMap"] {
            store.upsert_class(implementing(
                generic(class, ClassKind::Class, &["K", "V"]),
                vec![
                    TypeRef::class("java.util.Map", vec![tv("K"), tv("V")]),
                    serializable(),
                ],
            ));
        }

        store.upsert_class(implementing(
            generic("java.lang.String", ClassKind::Class, &[]),
            vec![
                serializable(),
                comparable_of("java.lang.String"),
                TypeRef::raw("java.lang.CharSequence"),
            ],
        ));

        let mut number = generic("java.lang.Number", ClassKind::Class, &[]);
        number.interfaces = vec![serializable()];
        store.upsert_class(number);

        for prim in PrimitiveType::ALL {
            let name = prim.boxed_name();
            let mut boxed = generic(name, ClassKind::Class, &[]);
            if !matches!(prim, PrimitiveType::Boolean | PrimitiveType::Char) {
                boxed.super_class = Some(TypeRef::raw("java.lang.Number"));
            }
            boxed.interfaces = vec![serializable(), comparable_of(name)];
            store.upsert_class(boxed);
        }
        store.upsert_class(generic("java.lang.Void", ClassKind::Class, &[]));

        let mut enum_def = generic("java.lang.Enum", ClassKind::Class, &["E"]);
        enum_def.type_params[0].upper_bounds =
            vec![TypeRef::class("java.lang.Enum", vec![tv("E")])];
        enum_def.interfaces = vec![
            TypeRef::class("java.lang.Comparable", vec![tv("E")]),
            serializable(),
        ];
        store.upsert_class(enum_def);
        store.upsert_class(generic("java.lang.Record", ClassKind::Class, &[]));

        store
    }
}
